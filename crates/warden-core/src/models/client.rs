//! Client domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An application registered under a resource server.
///
/// After every successful update of the parent, `scopes` is a subset of the
/// parent's scopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub resource_server_id: Uuid,
    pub client_id: String,
    pub name: String,
    pub scopes: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to register a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClient {
    pub resource_server_id: Uuid,
    pub client_id: String,
    pub name: String,
    pub scopes: Vec<String>,
}
