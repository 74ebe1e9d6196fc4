//! Buffered SurrealDB transactions.
//!
//! Writes are staged as SurrealQL statements and sent as a single
//! `BEGIN TRANSACTION … COMMIT TRANSACTION` batch on commit, so a failing
//! statement cancels the whole batch. Each staged write reads its values
//! from one element of the `$ops` parameter array.
//!
//! Guarded writes are expressed as a single `IF … { THROW … }` statement so
//! that the thrown marker is the first error reported for the batch.

use chrono::Utc;
use serde::Serialize;
use surrealdb::{Connection, Surreal};
use tracing::debug;
use uuid::Uuid;
use warden_core::error::{WardenError, WardenResult};
use warden_core::models::client::Client;
use warden_core::models::owner::Owner;
use warden_core::models::resource_server::{NewResourceServer, ResourceServer};
use warden_core::repository::{Transaction, TransactionManager};

use crate::error::{DbError, REVISION_CONFLICT};
use crate::repository::{select_by_id_and_owner, select_by_resource_server};

#[derive(Serialize)]
struct ResourceServerParams<'a> {
    id: String,
    owner: &'a str,
    server_key: &'a str,
    server_secret: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact_email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thumbnail_url: Option<&'a str>,
    scopes: &'a [String],
    revision: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_revision: Option<u64>,
    created_at: String,
    updated_at: String,
}

impl<'a> ResourceServerParams<'a> {
    fn from_entity(server: &'a ResourceServer, expected_revision: Option<u64>) -> Self {
        Self {
            id: server.id.to_string(),
            owner: server.owner.as_str(),
            server_key: &server.key,
            server_secret: &server.secret,
            name: &server.name,
            description: server.description.as_deref(),
            contact_name: server.contact_name.as_deref(),
            contact_email: server.contact_email.as_deref(),
            thumbnail_url: server.thumbnail_url.as_deref(),
            scopes: &server.scopes,
            revision: server.version,
            expected_revision,
            created_at: server.created_at.to_rfc3339(),
            updated_at: server.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
struct DeleteParams<'a> {
    id: String,
    owner: &'a str,
}

#[derive(Serialize)]
struct ClientPruneParams<'a> {
    resource_server_id: String,
    removed: &'a [String],
    updated_at: String,
}

/// A unit of work against SurrealDB. Dropping it without commit discards
/// every staged write.
pub struct SurrealTransaction<C: Connection> {
    db: Surreal<C>,
    statements: Vec<String>,
    params: Vec<serde_json::Value>,
}

impl<C: Connection> SurrealTransaction<C> {
    fn new(db: Surreal<C>) -> Self {
        Self {
            db,
            statements: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Number of writes staged so far.
    pub fn staged(&self) -> usize {
        self.statements.len()
    }

    /// Pushes one parameter object and the statement that consumes it.
    /// `render` receives the parameter path, e.g. `$ops[3]`.
    fn stage<P: Serialize>(
        &mut self,
        params: &P,
        render: impl FnOnce(&str) -> String,
    ) -> WardenResult<()> {
        let value = serde_json::to_value(params)
            .map_err(|e| WardenError::Internal(format!("unserializable parameters: {e}")))?;
        let path = format!("$ops[{}]", self.params.len());
        self.params.push(value);
        self.statements.push(render(&path));
        Ok(())
    }
}

impl<C: Connection> Drop for SurrealTransaction<C> {
    fn drop(&mut self) {
        if !self.statements.is_empty() {
            debug!(
                discarded = self.statements.len(),
                "Transaction dropped without commit, staged writes discarded"
            );
        }
    }
}

impl<C: Connection> Transaction for SurrealTransaction<C> {
    async fn find_resource_server(
        &mut self,
        id: Uuid,
        owner: &Owner,
    ) -> WardenResult<Option<ResourceServer>> {
        Ok(select_by_id_and_owner(&self.db, id, owner).await?)
    }

    async fn clients_of(&mut self, resource_server_id: Uuid) -> WardenResult<Vec<Client>> {
        Ok(select_by_resource_server(&self.db, resource_server_id).await?)
    }

    async fn create_resource_server(
        &mut self,
        input: NewResourceServer,
    ) -> WardenResult<ResourceServer> {
        let now = Utc::now();
        let server = ResourceServer {
            id: Uuid::new_v4(),
            key: input.key,
            secret: input.secret,
            owner: input.owner,
            name: input.name,
            description: input.description,
            contact_name: input.contact_name,
            contact_email: input.contact_email,
            thumbnail_url: input.thumbnail_url,
            scopes: input.scopes,
            version: 1,
            created_at: now,
            updated_at: now,
        };

        self.stage(&ResourceServerParams::from_entity(&server, None), |p| {
            format!(
                "CREATE type::record('resource_server', {p}.id) SET \
                 owner = {p}.owner, server_key = {p}.server_key, \
                 server_secret = {p}.server_secret, name = {p}.name, \
                 description = {p}.description, contact_name = {p}.contact_name, \
                 contact_email = {p}.contact_email, thumbnail_url = {p}.thumbnail_url, \
                 scopes = {p}.scopes, revision = {p}.revision, \
                 created_at = <datetime>({p}.created_at), \
                 updated_at = <datetime>({p}.updated_at);"
            )
        })?;

        Ok(server)
    }

    async fn save_resource_server(
        &mut self,
        server: &ResourceServer,
        expected_version: u64,
    ) -> WardenResult<ResourceServer> {
        let saved = ResourceServer {
            version: expected_version + 1,
            updated_at: Utc::now(),
            ..server.clone()
        };

        self.stage(
            &ResourceServerParams::from_entity(&saved, Some(expected_version)),
            |p| {
                format!(
                    "IF array::len((UPDATE type::record('resource_server', {p}.id) SET \
                     name = {p}.name, description = {p}.description, \
                     contact_name = {p}.contact_name, contact_email = {p}.contact_email, \
                     thumbnail_url = {p}.thumbnail_url, scopes = {p}.scopes, \
                     revision = {p}.revision, updated_at = <datetime>({p}.updated_at) \
                     WHERE owner = {p}.owner AND revision = {p}.expected_revision)) = 0 \
                     {{ THROW '{REVISION_CONFLICT}' }};"
                )
            },
        )?;

        Ok(saved)
    }

    async fn delete_resource_server(&mut self, id: Uuid, owner: &Owner) -> WardenResult<()> {
        let params = DeleteParams {
            id: id.to_string(),
            owner: owner.as_str(),
        };

        self.stage(&params, |p| {
            format!(
                "IF array::len((DELETE type::record('resource_server', {p}.id) \
                 WHERE owner = {p}.owner RETURN BEFORE)) > 0 \
                 {{ DELETE oauth_client WHERE resource_server_id = {p}.id }};"
            )
        })?;

        Ok(())
    }

    async fn prune_client_scopes(
        &mut self,
        resource_server_id: Uuid,
        removed: &[String],
    ) -> WardenResult<()> {
        if removed.is_empty() {
            return Ok(());
        }

        let params = ClientPruneParams {
            resource_server_id: resource_server_id.to_string(),
            removed,
            updated_at: Utc::now().to_rfc3339(),
        };

        // Evaluated at commit against the rows as they are then.
        self.stage(&params, |p| {
            format!(
                "UPDATE oauth_client SET \
                 scopes = array::complement(scopes, {p}.removed), \
                 updated_at = <datetime>({p}.updated_at) \
                 WHERE resource_server_id = {p}.resource_server_id \
                 AND scopes CONTAINSANY {p}.removed;"
            )
        })?;

        Ok(())
    }

    async fn commit(mut self) -> WardenResult<()> {
        let statements = std::mem::take(&mut self.statements);
        let params = std::mem::take(&mut self.params);
        if statements.is_empty() {
            return Ok(());
        }

        debug!(statements = statements.len(), "Committing transaction");

        let query = format!(
            "BEGIN TRANSACTION;\n{}\nCOMMIT TRANSACTION;",
            statements.join("\n")
        );

        self.db
            .query(query)
            .bind(("ops", serde_json::Value::Array(params)))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }

    async fn rollback(mut self) -> WardenResult<()> {
        let discarded = std::mem::take(&mut self.statements).len();
        self.params.clear();
        debug!(discarded, "Transaction rolled back");
        Ok(())
    }
}

/// Hands out [`SurrealTransaction`]s over a shared connection.
#[derive(Clone)]
pub struct SurrealTransactionManager<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTransactionManager<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TransactionManager for SurrealTransactionManager<C> {
    type Tx = SurrealTransaction<C>;

    async fn begin(&self) -> WardenResult<Self::Tx> {
        Ok(SurrealTransaction::new(self.db.clone()))
    }
}
