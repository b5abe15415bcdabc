//! Merging the `user_id` query parameter into a payment page URL.
//!
//! The configured payment URL may be absolute (`https://pay.example/pay`),
//! site-relative (`/billing/pay?lang=en`) or plain broken. Every shape must
//! come out with exactly one `user_id` parameter and the rest of its query,
//! path and fragment intact. Query pieces other than `user_id` are copied
//! byte for byte, never re-encoded.

use url::{form_urlencoded, Position, Url};

/// Payment page used when no usable base URL is configured.
pub const DEFAULT_PAYMENT_URL: &str = "https://pay.gtstor.com/payment.php";

/// Query parameter carrying the user id to the payment page.
pub const USER_ID_PARAM: &str = "user_id";

/// Base for resolving relative references. Its authority never reaches the output.
const PLACEHOLDER_BASE: &str = "http://placeholder.invalid/";

/// Returns `base` with its `user_id` query parameter set to `user_id`.
///
/// Blank bases produce the default payment URL. Relative bases stay relative.
/// Malformed bases are split by hand instead of rejected.
pub fn merge_user_id(base: &str, user_id: &str) -> String {
    let trimmed = base.trim();
    if trimmed.is_empty() {
        return fallback_payment_url(user_id);
    }

    if let Ok(mut absolute) = Url::parse(trimmed) {
        set_user_id(&mut absolute, user_id);
        return absolute.into();
    }

    if let Some(relative) = merge_relative(trimmed, user_id) {
        return relative;
    }

    merge_by_splitting(trimmed, user_id)
}

/// `DEFAULT_PAYMENT_URL?user_id=<id>`.
pub fn fallback_payment_url(user_id: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(USER_ID_PARAM, user_id)
        .finish();
    format!("{}?{}", DEFAULT_PAYMENT_URL, query)
}

fn set_user_id(url: &mut Url, user_id: &str) {
    let merged = merge_query(url.query().unwrap_or(""), user_id);
    url.set_query(Some(&merged));
}

fn merge_relative(reference: &str, user_id: &str) -> Option<String> {
    let base = Url::parse(PLACEHOLDER_BASE).ok()?;
    let mut joined = base.join(reference).ok()?;
    set_user_id(&mut joined, user_id);

    if reference.starts_with("//") {
        // Scheme-relative: the authority is the caller's, keep it.
        return Some(format!("//{}", &joined[Position::BeforeUsername..]));
    }

    Some(joined[Position::BeforePath..].to_string())
}

fn merge_by_splitting(input: &str, user_id: &str) -> String {
    let (before_fragment, fragment) = match input.split_once('#') {
        Some((before, fragment)) => (before, Some(fragment)),
        None => (input, None),
    };
    let (path, query) = match before_fragment.split_once('?') {
        Some((path, query)) => (path, query),
        None => (before_fragment, ""),
    };

    let mut merged = path.to_string();
    merged.push('?');
    merged.push_str(&merge_query(query, user_id));
    if let Some(fragment) = fragment.filter(|fragment| !fragment.is_empty()) {
        merged.push('#');
        merged.push_str(fragment);
    }
    merged
}

/// Rewrites a raw query string so it carries `user_id` exactly once.
///
/// The first `user_id` piece is replaced in place, later ones are dropped and
/// the pair is appended when absent. Empty pieces (`a=1&&b=2`) are dropped;
/// every other piece is kept verbatim.
fn merge_query(query: &str, user_id: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(user_id.as_bytes()).collect();
    let user_id_piece = format!("{}={}", USER_ID_PARAM, encoded);

    let mut pieces: Vec<&str> = Vec::new();
    let mut placed = false;
    for piece in query.split('&').filter(|piece| !piece.is_empty()) {
        if is_user_id_piece(piece) {
            if !placed {
                pieces.push(&user_id_piece);
                placed = true;
            }
        } else {
            pieces.push(piece);
        }
    }
    if !placed {
        pieces.push(&user_id_piece);
    }
    pieces.join("&")
}

/// True when the piece's decoded key is `user_id` (so `user%5Fid=x` counts).
fn is_user_id_piece(piece: &str) -> bool {
    form_urlencoded::parse(piece.as_bytes())
        .next()
        .is_some_and(|(key, _)| key == USER_ID_PARAM)
}
