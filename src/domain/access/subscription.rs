//! Subscription records, active-flag derivation and the subscription index.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use super::loose::{
    coerce_text, first_present, first_text, parse_bool_like, records_from_document, RawRecord,
    EXPIRY_FIELDS, LINKED_ID_FIELDS, PLAN_NAME_FIELDS, USER_ID_FIELDS,
};
use crate::domain::foundation::{Timestamp, UserId};

/// Name of the array property in an object-shaped subscription store file.
pub const SUBSCRIPTIONS_COLLECTION: &str = "subscriptions";

/// Status tokens that grant access unless the subscription has expired.
pub const ACTIVE_STATUSES: [&str; 4] = ["active", "trialing", "grace", "grace_period"];

/// Status tokens that never grant access.
pub const INACTIVE_STATUSES: [&str; 4] = ["canceled", "cancelled", "past_due", "inactive"];

/// How a subscription row decides whether it is active.
///
/// Decoded once per file load; evaluated against the clock on every lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityRule {
    /// The row carries a resolvable `active` flag. Status and expiry are ignored.
    Explicit(bool),
    /// The status is in [`ACTIVE_STATUSES`]; active until `expires`, if known.
    ActiveStatus { expires: Option<Timestamp> },
    /// The status is in [`INACTIVE_STATUSES`].
    InactiveStatus,
    /// No usable flag or status, but a parseable expiry.
    Expiry(Timestamp),
    /// Nothing to go on.
    Unknown,
}

impl ActivityRule {
    /// Derives the rule for a raw row.
    pub fn derive(raw: &RawRecord) -> Self {
        if let Some(active) = raw.get("active").and_then(parse_bool_like) {
            return ActivityRule::Explicit(active);
        }

        let expires = first_text(raw, &EXPIRY_FIELDS)
            .as_deref()
            .and_then(Timestamp::parse_lenient);

        let status = raw
            .get("status")
            .and_then(coerce_text)
            .map(|status| status.to_ascii_lowercase());

        match status.as_deref() {
            Some(status) if ACTIVE_STATUSES.contains(&status) => {
                ActivityRule::ActiveStatus { expires }
            }
            Some(status) if INACTIVE_STATUSES.contains(&status) => ActivityRule::InactiveStatus,
            _ => match expires {
                Some(expires) => ActivityRule::Expiry(expires),
                None => ActivityRule::Unknown,
            },
        }
    }

    /// Whether the rule grants access at `now`.
    pub fn is_active_at(&self, now: &Timestamp) -> bool {
        match self {
            ActivityRule::Explicit(active) => *active,
            ActivityRule::ActiveStatus { expires } => {
                expires.map_or(true, |expires| !expires.is_before(now))
            }
            ActivityRule::InactiveStatus => false,
            ActivityRule::Expiry(expires) => expires.is_after(now),
            ActivityRule::Unknown => false,
        }
    }
}

/// A subscription row as loaded from the store, before evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionEntry {
    pub user_id: UserId,
    pub linked_id: Option<UserId>,
    pub status: Option<String>,
    pub plan_name: Option<String>,
    pub expires_at: Option<String>,
    pub rule: ActivityRule,
}

impl SubscriptionEntry {
    /// Normalizes one raw record, or returns `None` when it has no usable id.
    pub fn from_raw(raw: &RawRecord) -> Option<Self> {
        let linked_id = first_text(raw, &LINKED_ID_FIELDS).and_then(|id| UserId::new(id).ok());

        let user_id = match first_present(raw, &USER_ID_FIELDS) {
            Some(value) => coerce_text(value).and_then(|id| UserId::new(id).ok()),
            None => linked_id.clone(),
        }?;

        Some(Self {
            user_id,
            linked_id,
            status: raw.get("status").and_then(coerce_text),
            plan_name: first_text(raw, &PLAN_NAME_FIELDS),
            expires_at: first_text(raw, &EXPIRY_FIELDS),
            rule: ActivityRule::derive(raw),
        })
    }

    /// Produces the record as seen at `now`.
    pub fn evaluate(&self, now: &Timestamp) -> SubscriptionRecord {
        SubscriptionRecord {
            user_id: self.user_id.clone(),
            linked_id: self.linked_id.clone(),
            status: self.status.clone(),
            active: self.rule.is_active_at(now),
            plan_name: self.plan_name.clone(),
            expires_at: self.expires_at.clone(),
        }
    }
}

/// A normalized subscription row with its derived `active` flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRecord {
    pub user_id: UserId,
    pub linked_id: Option<UserId>,
    pub status: Option<String>,
    pub active: bool,
    pub plan_name: Option<String>,
    pub expires_at: Option<String>,
}

/// Extra keys a subscription lookup may try after the identifier itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionLookup {
    /// A linked id known from the user store.
    pub also_try_linked_id: Option<String>,
    /// Further ids tried last, in order.
    pub aliases: Vec<String>,
}

impl SubscriptionLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the linked id fallback.
    pub fn with_linked_id(mut self, linked_id: Option<impl Into<String>>) -> Self {
        self.also_try_linked_id = linked_id.map(Into::into);
        self
    }

    /// Adds an alias tried after the linked id.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }
}

/// Subscription rows indexed by primary and linked id.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionIndex {
    by_user_id: HashMap<String, SubscriptionEntry>,
    by_linked_id: HashMap<String, SubscriptionEntry>,
}

impl SubscriptionIndex {
    /// Builds the index from a parsed store document. Later rows win.
    pub fn from_document(document: Value) -> Self {
        let raw_records = records_from_document(document, SUBSCRIPTIONS_COLLECTION);
        Self::from_entries(raw_records.iter().filter_map(SubscriptionEntry::from_raw))
    }

    pub fn from_entries(entries: impl IntoIterator<Item = SubscriptionEntry>) -> Self {
        let mut index = Self::default();
        for entry in entries {
            if let Some(linked_id) = &entry.linked_id {
                index
                    .by_linked_id
                    .insert(linked_id.as_str().to_string(), entry.clone());
            }
            index
                .by_user_id
                .insert(entry.user_id.as_str().to_string(), entry);
        }
        index
    }

    /// Finds the entry for a trimmed identifier.
    ///
    /// Order: the identifier as a primary id; the linked id from `lookup` as a
    /// primary id, then as a linked id; the identifier as a linked id; each
    /// alias as a primary id, then as a linked id.
    pub fn find(&self, identifier: &str, lookup: &SubscriptionLookup) -> Option<&SubscriptionEntry> {
        if let Some(entry) = self.by_user_id.get(identifier) {
            return Some(entry);
        }

        let linked_id = lookup
            .also_try_linked_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty());
        if let Some(entry) = linked_id.and_then(|id| self.find_either(id)) {
            return Some(entry);
        }

        if let Some(entry) = self.by_linked_id.get(identifier) {
            return Some(entry);
        }

        lookup
            .aliases
            .iter()
            .map(|alias| alias.trim())
            .filter(|alias| !alias.is_empty())
            .find_map(|alias| self.find_either(alias))
    }

    fn find_either(&self, id: &str) -> Option<&SubscriptionEntry> {
        self.by_user_id
            .get(id)
            .or_else(|| self.by_linked_id.get(id))
    }

    pub fn len(&self) -> usize {
        self.by_user_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_user_id.is_empty()
    }
}
