//! Subscription status as reported to callers of the status service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::subscription::SubscriptionRecord;

/// Payload keys probed for an active flag, in priority order.
pub const ACTIVE_PAYLOAD_KEYS: [&str; 6] = [
    "active",
    "isActive",
    "subscription_active",
    "hasSubscription",
    "subscription",
    "status",
];

/// Billing status tokens that read as active.
const ACTIVE_BILLING_STATUSES: [&str; 3] = ["trial", "trialing", "active"];

/// Billing status tokens that read as inactive.
const INACTIVE_BILLING_STATUSES: [&str; 5] = [
    "canceled",
    "cancelled",
    "unpaid",
    "incomplete",
    "incomplete_expired",
];

const TRUE_TOKENS: [&str; 4] = ["1", "true", "yes", "active"];
const FALSE_TOKENS: [&str; 4] = ["0", "false", "no", "inactive"];

/// Ids that are always subscribed, with their fixed plan and expiry.
const STATIC_SUBSCRIPTIONS: [(&str, &str, &str); 1] = [("3001", "default", "2099-12-31T23:59:59Z")];

/// Where a status answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusSource {
    EnvironmentOverride,
    RemoteEndpoint,
    Database,
    StaticTable,
    Default,
}

/// Subscription status for one user id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatus {
    pub active: bool,
    pub plan_name: Option<String>,
    pub expires_at: Option<String>,
    pub source: StatusSource,
    /// The remote payload, only for [`StatusSource::RemoteEndpoint`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

impl SubscriptionStatus {
    /// The answer when nothing knows the id.
    pub fn inactive() -> Self {
        Self {
            active: false,
            plan_name: None,
            expires_at: None,
            source: StatusSource::Default,
            raw: None,
        }
    }

    /// An active status granted by configuration.
    pub fn overridden(plan_name: Option<String>, expires_at: Option<String>) -> Self {
        Self {
            active: true,
            plan_name,
            expires_at,
            source: StatusSource::EnvironmentOverride,
            raw: None,
        }
    }

    /// Status derived from a subscription store row.
    pub fn from_record(record: &SubscriptionRecord) -> Self {
        Self {
            active: record.active,
            plan_name: record.plan_name.clone(),
            expires_at: record.expires_at.clone(),
            source: StatusSource::Database,
            raw: None,
        }
    }

    /// Status read from a remote payload, or `None` when no flag is recognizable.
    ///
    /// `planName` and `expiresAt` are copied only when they are strings.
    pub fn from_payload(payload: Value) -> Option<Self> {
        let active = extract_active_from_payload(&payload)?;
        let text_field = |key: &str| payload.get(key).and_then(Value::as_str).map(str::to_string);

        Some(Self {
            active,
            plan_name: text_field("planName"),
            expires_at: text_field("expiresAt"),
            source: StatusSource::RemoteEndpoint,
            raw: Some(payload),
        })
    }
}

/// The fixed status for ids in the built-in table.
pub fn static_subscription(user_id: &str) -> Option<SubscriptionStatus> {
    STATIC_SUBSCRIPTIONS
        .iter()
        .find(|(id, _, _)| *id == user_id)
        .map(|(_, plan, expires)| SubscriptionStatus {
            active: true,
            plan_name: Some((*plan).to_string()),
            expires_at: Some((*expires).to_string()),
            source: StatusSource::StaticTable,
            raw: None,
        })
}

/// Reads a flag from a remote payload value.
///
/// Billing statuses are checked before the plain boolean tokens, so
/// `"trial"` is active and `"unpaid"` is not.
pub fn parse_status_token(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_f64().map(|n| n != 0.0),
        Value::String(text) => {
            let token = text.trim().to_ascii_lowercase();
            let token = token.as_str();
            if ACTIVE_BILLING_STATUSES.contains(&token) || TRUE_TOKENS.contains(&token) {
                Some(true)
            } else if INACTIVE_BILLING_STATUSES.contains(&token) || FALSE_TOKENS.contains(&token) {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// First resolvable flag among [`ACTIVE_PAYLOAD_KEYS`]. Non-object payloads yield `None`.
pub fn extract_active_from_payload(payload: &Value) -> Option<bool> {
    let object = payload.as_object()?;
    ACTIVE_PAYLOAD_KEYS
        .iter()
        .filter_map(|key| object.get(*key))
        .find_map(parse_status_token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use serde_json::json;

    #[test]
    fn billing_statuses_resolve() {
        for token in ["trial", "Trialing", " active "] {
            assert_eq!(parse_status_token(&json!(token)), Some(true), "{token}");
        }
        for token in ["canceled", "cancelled", "unpaid", "incomplete", "INCOMPLETE_EXPIRED"] {
            assert_eq!(parse_status_token(&json!(token)), Some(false), "{token}");
        }
    }

    #[test]
    fn plain_tokens_and_scalars_resolve() {
        assert_eq!(parse_status_token(&json!("yes")), Some(true));
        assert_eq!(parse_status_token(&json!("inactive")), Some(false));
        assert_eq!(parse_status_token(&json!(2)), Some(true));
        assert_eq!(parse_status_token(&json!(0)), Some(false));
        assert_eq!(parse_status_token(&json!(false)), Some(false));
        assert_eq!(parse_status_token(&json!("enabled")), None);
        assert_eq!(parse_status_token(&json!({"active": true})), None);
    }

    #[test]
    fn payload_keys_are_probed_in_order() {
        let payload = json!({"status": "canceled", "isActive": true});
        assert_eq!(extract_active_from_payload(&payload), Some(true));
    }

    #[test]
    fn unresolvable_keys_are_skipped() {
        let payload = json!({"active": "maybe", "subscription": {"plan": "pro"}, "status": "trialing"});
        assert_eq!(extract_active_from_payload(&payload), Some(true));
    }

    #[test]
    fn payload_without_flag_is_unrecognized() {
        assert_eq!(extract_active_from_payload(&json!({"plan": "pro"})), None);
        assert_eq!(extract_active_from_payload(&json!([true])), None);
        assert!(SubscriptionStatus::from_payload(json!({"ok": 1})).is_none());
    }

    #[test]
    fn from_payload_copies_string_fields_only() {
        let status = SubscriptionStatus::from_payload(json!({
            "hasSubscription": 1,
            "planName": "pro",
            "expiresAt": 1234
        }))
        .unwrap();

        assert!(status.active);
        assert_eq!(status.plan_name.as_deref(), Some("pro"));
        assert_eq!(status.expires_at, None);
        assert_eq!(status.source, StatusSource::RemoteEndpoint);
        assert!(status.raw.is_some());
    }

    #[test]
    fn static_table_knows_3001() {
        let status = static_subscription("3001").unwrap();
        assert!(status.active);
        assert_eq!(status.plan_name.as_deref(), Some("default"));
        assert_eq!(status.expires_at.as_deref(), Some("2099-12-31T23:59:59Z"));
        assert_eq!(status.source, StatusSource::StaticTable);
        assert!(static_subscription("3002").is_none());
    }

    #[test]
    fn from_record_reports_database_source() {
        let record = SubscriptionRecord {
            user_id: UserId::new("a").unwrap(),
            linked_id: None,
            status: Some("canceled".to_string()),
            active: false,
            plan_name: Some("basic".to_string()),
            expires_at: None,
        };
        let status = SubscriptionStatus::from_record(&record);
        assert!(!status.active);
        assert_eq!(status.plan_name.as_deref(), Some("basic"));
        assert_eq!(status.source, StatusSource::Database);
    }

    #[test]
    fn serializes_camel_case_without_raw() {
        let json = serde_json::to_value(SubscriptionStatus::inactive()).unwrap();
        assert_eq!(
            json,
            json!({"active": false, "planName": null, "expiresAt": null, "source": "default"})
        );
    }
}
