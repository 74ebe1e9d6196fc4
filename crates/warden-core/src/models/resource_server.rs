//! Resource server domain model.
//!
//! A resource server is a protected API registered by an owner. Its scope
//! list is the universe of capabilities its clients may be granted.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::owner::Owner;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceServer {
    pub id: Uuid,
    /// Server-generated, write-once.
    pub key: String,
    /// Server-generated, write-once.
    pub secret: String,
    /// Set from the caller identity at creation; never changes.
    pub owner: Owner,
    pub name: String,
    pub description: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    #[serde(rename = "thumbNailUrl")]
    pub thumbnail_url: Option<String>,
    /// Ordered set of unique scope names.
    pub scopes: Vec<String>,
    /// Optimistic concurrency stamp, starts at 1.
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied resource server, as received on create and update.
///
/// `key`, `secret` and `owner` are accepted so that a client can send back
/// an entity it previously read, but they are never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceServerDraft {
    pub name: String,
    pub description: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    #[serde(rename = "thumbNailUrl")]
    pub thumbnail_url: Option<String>,
    pub scopes: Vec<String>,
    /// When present on update, must match the stored version.
    pub version: Option<u64>,
    pub key: Option<String>,
    pub secret: Option<String>,
    pub owner: Option<String>,
}

/// Fully resolved fields of a resource server about to be created.
#[derive(Debug, Clone)]
pub struct NewResourceServer {
    pub key: String,
    pub secret: String,
    pub owner: Owner,
    pub name: String,
    pub description: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub thumbnail_url: Option<String>,
    pub scopes: Vec<String>,
}

/// Drops repeated scope names, keeping the first occurrence of each.
pub fn dedup_scopes(scopes: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(scopes.len());
    scopes
        .iter()
        .filter(|scope| seen.insert(scope.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        let scopes = strings(&["read", "write", "read", "admin", "write"]);
        assert_eq!(dedup_scopes(&scopes), strings(&["read", "write", "admin"]));
    }

    #[test]
    fn draft_accepts_partial_camel_case_payload() {
        let draft: ResourceServerDraft = serde_json::from_str(
            r#"{"name":"api","contactEmail":"ops@example.com","thumbNailUrl":"https://x/y.png","scopes":["read"],"key":"forged"}"#,
        )
        .unwrap();
        assert_eq!(draft.name, "api");
        assert_eq!(draft.contact_email.as_deref(), Some("ops@example.com"));
        assert_eq!(draft.thumbnail_url.as_deref(), Some("https://x/y.png"));
        assert_eq!(draft.key.as_deref(), Some("forged"));
        assert!(draft.version.is_none());
        assert!(draft.owner.is_none());
    }
}
