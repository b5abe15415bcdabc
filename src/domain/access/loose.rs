//! Decoding of loosely-typed JSON values from the flat-file stores.
//!
//! Both stores are edited by hand and by scripts, so the same field shows up
//! as a boolean, a number or a string, under camelCase or snake_case keys.
//! Everything in here is pure and turns those shapes into strict values once,
//! at load time.

use serde_json::{Map, Value};

/// A single record object as it appears in a store file.
pub type RawRecord = Map<String, Value>;

/// String tokens read as `true` by [`parse_bool_like`].
pub const TRUTHY_TOKENS: [&str; 5] = ["true", "1", "yes", "y", "enabled"];

/// String tokens read as `false` by [`parse_bool_like`].
pub const FALSY_TOKENS: [&str; 5] = ["false", "0", "no", "n", "disabled"];

/// Aliases for a record's primary id, in priority order.
pub const USER_ID_FIELDS: [&str; 2] = ["userId", "user_id"];

/// Aliases for a record's linked id, in priority order.
pub const LINKED_ID_FIELDS: [&str; 4] = ["linkedId", "linked_id", "gtcUserId", "gtc_user_id"];

/// Aliases for the direct chat access flag.
pub const CHAT_ACCESS_FIELDS: [&str; 2] = ["chatAccess", "chat_access"];

/// Aliases for a subscription's expiry instant.
pub const EXPIRY_FIELDS: [&str; 4] = ["expiresAt", "expires_at", "endDate", "end_date"];

/// Aliases for a subscription's plan name.
pub const PLAN_NAME_FIELDS: [&str; 2] = ["planName", "plan_name"];

/// Reads a boolean out of a boolean, number or token string.
///
/// Numbers are true when non-zero. Strings are trimmed and compared
/// case-insensitively against [`TRUTHY_TOKENS`] and [`FALSY_TOKENS`].
pub fn parse_bool_like(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_f64().map(|n| n != 0.0),
        Value::String(text) => parse_bool_token(text),
        _ => None,
    }
}

fn parse_bool_token(text: &str) -> Option<bool> {
    let token = text.trim().to_ascii_lowercase();
    if TRUTHY_TOKENS.contains(&token.as_str()) {
        Some(true)
    } else if FALSY_TOKENS.contains(&token.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Reads a provider list from either an array of strings or one delimited string.
///
/// Strings are split on runs of `,` and `;`. Entries are trimmed, empty entries
/// and non-string array items are dropped, order is kept.
pub fn parse_providers(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(text)) => text
            .split([',', ';'])
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Coerces a string or number into a trimmed, non-empty string.
///
/// Integral numbers render without a fraction; non-finite numbers and any
/// other JSON type yield `None`.
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => {
            if let Some(n) = number.as_i64() {
                Some(n.to_string())
            } else if let Some(n) = number.as_u64() {
                Some(n.to_string())
            } else {
                number
                    .as_f64()
                    .filter(|n| n.is_finite())
                    .map(|n| n.to_string())
            }
        }
        _ => None,
    }
}

/// Returns the value of the first key in `keys` that is present and not null.
pub fn first_present<'a>(record: &'a RawRecord, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| record.get(*key).filter(|value| !value.is_null()))
}

/// [`first_present`] followed by [`coerce_text`].
pub fn first_text(record: &RawRecord, keys: &[&str]) -> Option<String> {
    first_present(record, keys).and_then(coerce_text)
}

/// Extracts record objects from a parsed store document.
///
/// The document is either an array of records or an object holding that array
/// under `collection_key`. Any other shape yields no records; array entries
/// that are not objects are skipped.
pub fn records_from_document(document: Value, collection_key: &str) -> Vec<RawRecord> {
    let entries = match document {
        Value::Array(entries) => entries,
        Value::Object(mut wrapper) => match wrapper.remove(collection_key) {
            Some(Value::Array(entries)) => entries,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::Object(record) => Some(record),
            _ => None,
        })
        .collect()
}
