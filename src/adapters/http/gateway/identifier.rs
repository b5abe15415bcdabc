//! Extraction of the caller's identifier from query parameters and cookies.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use url::form_urlencoded;

/// Parameter and cookie names that may carry the identifier, in priority order.
pub const USER_ID_KEYS: [&str; 10] = [
    "user_id",
    "userId",
    "gtc_user_id",
    "gtcUserId",
    "gtcId",
    "id",
    "user",
    "uid",
    "account_id",
    "accountId",
];

/// Finds the identifier, checking the query string before cookies.
pub fn extract_identifier(raw_query: Option<&str>, headers: &HeaderMap) -> Option<String> {
    let query = query_pairs(raw_query.unwrap_or_default());
    first_identifier(&query).or_else(|| first_identifier(&cookie_pairs(headers)))
}

/// For each key of [`USER_ID_KEYS`] in order, the first non-blank value wins.
/// The winning value is trimmed.
pub fn first_identifier(pairs: &[(String, String)]) -> Option<String> {
    USER_ID_KEYS.iter().find_map(|key| {
        pairs
            .iter()
            .filter(|(name, _)| name == key)
            .map(|(_, value)| value.trim())
            .find(|value| !value.is_empty())
            .map(str::to_string)
    })
}

/// Decodes an `application/x-www-form-urlencoded` query string.
pub fn query_pairs(raw_query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(raw_query.as_bytes())
        .into_owned()
        .collect()
}

/// Reads every `name=value` pair of every `Cookie` header, in order.
///
/// Values are percent-decoded when they decode to valid UTF-8 and kept raw
/// otherwise. Pairs without `=` are skipped.
pub fn cookie_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| {
            let value = value.trim().trim_matches('"');
            let decoded = urlencoding::decode(value)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| value.to_string());
            (name.trim().to_string(), decoded)
        })
        .collect()
}
