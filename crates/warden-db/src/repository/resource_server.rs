//! SurrealDB implementation of [`ResourceServerRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use warden_core::error::WardenResult;
use warden_core::models::owner::Owner;
use warden_core::models::resource_server::ResourceServer;
use warden_core::repository::ResourceServerRepository;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ResourceServerRow {
    record_id: String,
    owner: String,
    server_key: String,
    server_secret: String,
    name: String,
    description: Option<String>,
    contact_name: Option<String>,
    contact_email: Option<String>,
    thumbnail_url: Option<String>,
    scopes: Vec<String>,
    revision: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ResourceServerRow {
    fn try_into_resource_server(self) -> Result<ResourceServer, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Malformed(format!("invalid UUID: {e}")))?;
        let owner = Owner::new(&self.owner)
            .ok_or_else(|| DbError::Malformed(format!("resource server {id} has no owner")))?;
        Ok(ResourceServer {
            id,
            key: self.server_key,
            secret: self.server_secret,
            owner,
            name: self.name,
            description: self.description,
            contact_name: self.contact_name,
            contact_email: self.contact_email,
            thumbnail_url: self.thumbnail_url,
            scopes: self.scopes,
            version: self.revision,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Owner-scoped point lookup, shared with the transaction read path.
pub(crate) async fn select_by_id_and_owner<C: Connection>(
    db: &Surreal<C>,
    id: Uuid,
    owner: &Owner,
) -> Result<Option<ResourceServer>, DbError> {
    let mut result = db
        .query(
            "SELECT meta::id(id) AS record_id, * \
             FROM type::record('resource_server', $id) \
             WHERE owner = $owner",
        )
        .bind(("id", id.to_string()))
        .bind(("owner", owner.as_str().to_string()))
        .await?;

    let rows: Vec<ResourceServerRow> = result.take(0)?;
    rows.into_iter()
        .next()
        .map(ResourceServerRow::try_into_resource_server)
        .transpose()
}

/// SurrealDB implementation of the resource server repository.
#[derive(Clone)]
pub struct SurrealResourceServerRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealResourceServerRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ResourceServerRepository for SurrealResourceServerRepository<C> {
    async fn find_by_owner(&self, owner: &Owner) -> WardenResult<Vec<ResourceServer>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM resource_server \
                 WHERE owner = $owner \
                 ORDER BY created_at ASC",
            )
            .bind(("owner", owner.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ResourceServerRow> = result.take(0).map_err(DbError::from)?;

        rows.into_iter()
            .map(|row| row.try_into_resource_server())
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }

    async fn find_by_id_and_owner(
        &self,
        id: Uuid,
        owner: &Owner,
    ) -> WardenResult<Option<ResourceServer>> {
        Ok(select_by_id_and_owner(&self.db, id, owner).await?)
    }

    async fn count(&self) -> WardenResult<u64> {
        let mut result = self
            .db
            .query("SELECT count() AS total FROM resource_server GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
