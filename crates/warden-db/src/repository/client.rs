//! SurrealDB implementation of [`ClientRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use warden_core::error::WardenResult;
use warden_core::models::client::{Client, CreateClient};
use warden_core::repository::ClientRepository;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ClientRow {
    record_id: String,
    resource_server_id: String,
    client_id: String,
    name: String,
    scopes: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ClientRow {
    fn try_into_client(self) -> Result<Client, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Malformed(format!("invalid UUID: {e}")))?;
        let resource_server_id = Uuid::parse_str(&self.resource_server_id)
            .map_err(|e| DbError::Malformed(format!("invalid resource server UUID: {e}")))?;
        Ok(Client {
            id,
            resource_server_id,
            client_id: self.client_id,
            name: self.name,
            scopes: self.scopes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Clients of one resource server, oldest first. Shared with the
/// transaction read path.
pub(crate) async fn select_by_resource_server<C: Connection>(
    db: &Surreal<C>,
    resource_server_id: Uuid,
) -> Result<Vec<Client>, DbError> {
    let mut result = db
        .query(
            "SELECT meta::id(id) AS record_id, * FROM oauth_client \
             WHERE resource_server_id = $resource_server_id \
             ORDER BY created_at ASC",
        )
        .bind(("resource_server_id", resource_server_id.to_string()))
        .await?;

    let rows: Vec<ClientRow> = result.take(0)?;
    rows.into_iter().map(ClientRow::try_into_client).collect()
}

/// SurrealDB implementation of the client repository.
#[derive(Clone)]
pub struct SurrealClientRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealClientRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ClientRepository for SurrealClientRepository<C> {
    async fn create(&self, input: CreateClient) -> WardenResult<Client> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('oauth_client', $id) SET \
                 resource_server_id = $resource_server_id, \
                 client_id = $client_id, \
                 name = $name, scopes = $scopes; \
                 SELECT meta::id(id) AS record_id, * \
                 FROM type::record('oauth_client', $id)",
            )
            .bind(("id", id_str.clone()))
            .bind(("resource_server_id", input.resource_server_id.to_string()))
            .bind(("client_id", input.client_id))
            .bind(("name", input.name))
            .bind(("scopes", input.scopes))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<ClientRow> = result.take(1).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "oauth_client".into(),
            id: id_str,
        })?;

        Ok(row.try_into_client()?)
    }

    async fn get_by_id(&self, id: Uuid) -> WardenResult<Client> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM type::record('oauth_client', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ClientRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "oauth_client".into(),
            id: id_str,
        })?;

        Ok(row.try_into_client()?)
    }

    async fn list_by_resource_server(&self, resource_server_id: Uuid) -> WardenResult<Vec<Client>> {
        Ok(select_by_resource_server(&self.db, resource_server_id).await?)
    }
}
