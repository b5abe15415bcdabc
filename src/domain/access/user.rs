//! User records and the in-memory index built from the user store file.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use super::loose::{
    coerce_text, first_present, first_text, parse_bool_like, parse_providers, records_from_document,
    RawRecord, CHAT_ACCESS_FIELDS, LINKED_ID_FIELDS, USER_ID_FIELDS,
};
use crate::domain::foundation::UserId;

/// Name of the array property in an object-shaped user store file.
pub const USERS_COLLECTION: &str = "users";

/// A normalized row of the user store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Primary key.
    pub user_id: UserId,
    /// Secondary key into the subscription store.
    pub linked_id: Option<UserId>,
    /// Sign-in providers, informational only.
    pub providers: Vec<String>,
    /// Explicit direct access override, if the row states one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_access: Option<bool>,
}

impl UserRecord {
    /// Normalizes one raw record, or returns `None` when it has no usable id.
    ///
    /// The primary id falls back to the linked id only when no primary id key
    /// is present at all; a present but blank primary id drops the record.
    pub fn from_raw(raw: &RawRecord) -> Option<Self> {
        let linked_id = first_text(raw, &LINKED_ID_FIELDS).and_then(|id| UserId::new(id).ok());

        let user_id = match first_present(raw, &USER_ID_FIELDS) {
            Some(value) => coerce_text(value).and_then(|id| UserId::new(id).ok()),
            None => linked_id.clone(),
        }?;

        Some(Self {
            user_id,
            linked_id,
            providers: parse_providers(raw.get("providers")),
            chat_access: first_present(raw, &CHAT_ACCESS_FIELDS).and_then(parse_bool_like),
        })
    }

    /// True only when the row explicitly grants chat access.
    pub fn has_direct_access(&self) -> bool {
        self.chat_access == Some(true)
    }
}

/// User records indexed by primary and linked id.
#[derive(Debug, Clone, Default)]
pub struct UserIndex {
    by_user_id: HashMap<String, UserRecord>,
    by_linked_id: HashMap<String, UserRecord>,
}

impl UserIndex {
    /// Builds the index from a parsed store document.
    ///
    /// Later rows win when two rows share a key.
    pub fn from_document(document: Value) -> Self {
        let raw_records = records_from_document(document, USERS_COLLECTION);
        Self::from_records(raw_records.iter().filter_map(UserRecord::from_raw))
    }

    /// Builds the index from already normalized records.
    pub fn from_records(records: impl IntoIterator<Item = UserRecord>) -> Self {
        let mut index = Self::default();
        for record in records {
            if let Some(linked_id) = &record.linked_id {
                index
                    .by_linked_id
                    .insert(linked_id.as_str().to_string(), record.clone());
            }
            index
                .by_user_id
                .insert(record.user_id.as_str().to_string(), record);
        }
        index
    }

    /// Looks up by primary id, then by linked id. `identifier` must be trimmed.
    pub fn find(&self, identifier: &str) -> Option<&UserRecord> {
        self.by_user_id
            .get(identifier)
            .or_else(|| self.by_linked_id.get(identifier))
    }

    /// Number of distinct primary ids.
    pub fn len(&self) -> usize {
        self.by_user_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_user_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // UserRecord::from_raw
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn normalizes_full_record() {
        let record = UserRecord::from_raw(&raw(json!({
            "userId": " user3001@example.com ",
            "gtcUserId": 3001,
            "providers": "google;telegram",
            "chatAccess": "Enabled"
        })))
        .unwrap();

        assert_eq!(record.user_id.as_str(), "user3001@example.com");
        assert_eq!(record.linked_id.as_ref().map(UserId::as_str), Some("3001"));
        assert_eq!(record.providers, vec!["google", "telegram"]);
        assert_eq!(record.chat_access, Some(true));
        assert!(record.has_direct_access());
    }

    #[test]
    fn primary_id_falls_back_to_linked_id_when_absent() {
        let record = UserRecord::from_raw(&raw(json!({"gtcUserId": "42"}))).unwrap();
        assert_eq!(record.user_id.as_str(), "42");
        assert_eq!(record.linked_id.as_ref().map(UserId::as_str), Some("42"));
    }

    #[test]
    fn blank_primary_id_drops_record() {
        assert!(UserRecord::from_raw(&raw(json!({"userId": "  ", "gtcUserId": "42"}))).is_none());
        assert!(UserRecord::from_raw(&raw(json!({"providers": ["google"]}))).is_none());
    }

    #[test]
    fn snake_case_chat_access_is_read() {
        let record = UserRecord::from_raw(&raw(json!({"user_id": "a", "chat_access": 0}))).unwrap();
        assert_eq!(record.chat_access, Some(false));
        assert!(!record.has_direct_access());
    }

    #[test]
    fn unresolvable_chat_access_is_undefined() {
        let record = UserRecord::from_raw(&raw(json!({"userId": "a", "chatAccess": "soon"}))).unwrap();
        assert_eq!(record.chat_access, None);
        assert!(!record.has_direct_access());
    }

    #[test]
    fn blank_linked_id_is_dropped() {
        let record = UserRecord::from_raw(&raw(json!({"userId": "a", "gtcUserId": " "}))).unwrap();
        assert!(record.linked_id.is_none());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // UserIndex
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn index_finds_by_primary_then_linked_id() {
        let index = UserIndex::from_document(json!({
            "users": [
                {"userId": "alice", "gtcUserId": "100"},
                {"userId": "100"}
            ]
        }));

        assert_eq!(index.len(), 2);
        // "100" is a primary id of the second row, which wins over the linked match.
        assert_eq!(index.find("100").unwrap().user_id.as_str(), "100");
        assert_eq!(index.find("alice").unwrap().user_id.as_str(), "alice");
    }

    #[test]
    fn index_finds_by_linked_id() {
        let index = UserIndex::from_document(json!([{"userId": "alice", "gtcUserId": "100"}]));
        assert_eq!(index.find("100").unwrap().user_id.as_str(), "alice");
        assert!(index.find("200").is_none());
    }

    #[test]
    fn later_rows_overwrite_earlier_rows() {
        let index = UserIndex::from_document(json!([
            {"userId": "alice", "chatAccess": false},
            {"userId": "alice", "chatAccess": true}
        ]));
        assert_eq!(index.len(), 1);
        assert!(index.find("alice").unwrap().has_direct_access());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let record = UserRecord::from_raw(&raw(json!({"userId": "a", "providers": []}))).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, json!({"userId": "a", "linkedId": null, "providers": []}));
    }
}
