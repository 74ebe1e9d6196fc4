//! Resource server manager: owner-scoped CRUD orchestration.

use tracing::{debug, info, warn};
use uuid::Uuid;
use warden_core::error::{WardenError, WardenResult};
use warden_core::models::owner::Owner;
use warden_core::models::resource_server::{
    NewResourceServer, ResourceServer, ResourceServerDraft, dedup_scopes,
};
use warden_core::repository::{ResourceServerRepository, Transaction, TransactionManager};

use crate::config::AdminConfig;
use crate::credentials::{CredentialGenerator, RandomCredentialGenerator};
use crate::reconcile;
use crate::validation::validate_draft;

const ENTITY: &str = "resource_server";

/// Resource server manager.
///
/// Generic over the store and transaction implementations so that the admin
/// layer has no dependency on the database crate. Every lookup is scoped by
/// owner; a server owned by someone else is reported as not found.
pub struct ResourceServerManager<R, T, G = RandomCredentialGenerator>
where
    R: ResourceServerRepository,
    T: TransactionManager,
    G: CredentialGenerator,
{
    servers: R,
    transactions: T,
    credentials: G,
    config: AdminConfig,
}

impl<R, T> ResourceServerManager<R, T>
where
    R: ResourceServerRepository,
    T: TransactionManager,
{
    pub fn new(servers: R, transactions: T, config: AdminConfig) -> Self {
        Self::with_credentials(servers, transactions, RandomCredentialGenerator, config)
    }
}

impl<R, T, G> ResourceServerManager<R, T, G>
where
    R: ResourceServerRepository,
    T: TransactionManager,
    G: CredentialGenerator,
{
    pub fn with_credentials(servers: R, transactions: T, credentials: G, config: AdminConfig) -> Self {
        Self {
            servers,
            transactions,
            credentials,
            config,
        }
    }

    pub async fn list_by_owner(&self, owner: &Owner) -> WardenResult<Vec<ResourceServer>> {
        self.servers.find_by_owner(owner).await
    }

    pub async fn get_by_id_and_owner(&self, id: Uuid, owner: &Owner) -> WardenResult<ResourceServer> {
        self.servers
            .find_by_id_and_owner(id, owner)
            .await?
            .ok_or_else(|| WardenError::not_found(ENTITY, id))
    }

    /// Registers a new resource server for `owner`.
    ///
    /// Caller-supplied `key`, `secret`, `owner` and `version` are ignored.
    /// A credential collision is retried with a fresh pair up to
    /// [`AdminConfig::credential_attempts`] times.
    pub async fn create(
        &self,
        owner: &Owner,
        draft: ResourceServerDraft,
    ) -> WardenResult<ResourceServer> {
        validate_draft(&draft, &self.config)?;
        let scopes = dedup_scopes(&draft.scopes);
        let attempts = self.config.credential_attempts.max(1);

        let mut attempt = 1;
        let server = loop {
            let input = NewResourceServer {
                key: self.credentials.generate_key(),
                secret: self.credentials.generate_secret(),
                owner: owner.clone(),
                name: draft.name.clone(),
                description: draft.description.clone(),
                contact_name: draft.contact_name.clone(),
                contact_email: draft.contact_email.clone(),
                thumbnail_url: draft.thumbnail_url.clone(),
                scopes: scopes.clone(),
            };

            let mut tx = self.transactions.begin().await?;
            let staged = tx.create_resource_server(input).await?;
            match tx.commit().await {
                Ok(()) => break staged,
                Err(WardenError::Conflict(reason)) if attempt < attempts => {
                    warn!(attempt, %reason, "Credential collision, regenerating");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        info!(
            resource_server_id = %server.id,
            owner = %owner,
            "Resource server created"
        );
        match self.servers.count().await {
            Ok(total) => debug!(total, "Resource servers in store"),
            Err(e) => warn!(error = %e, "Failed to count resource servers"),
        }

        Ok(server)
    }

    /// Replaces the mutable fields of an owned resource server and prunes
    /// scopes it no longer offers from its clients, all in one transaction.
    pub async fn update(
        &self,
        owner: &Owner,
        id: Uuid,
        draft: ResourceServerDraft,
    ) -> WardenResult<ResourceServer> {
        validate_draft(&draft, &self.config)?;

        let mut tx = self.transactions.begin().await?;
        let persisted = tx
            .find_resource_server(id, owner)
            .await?
            .ok_or_else(|| WardenError::not_found(ENTITY, id))?;

        if let Some(version) = draft.version {
            if version != persisted.version {
                return Err(WardenError::Conflict(format!(
                    "resource server {id} is at version {}, not {version}",
                    persisted.version
                )));
            }
        }

        let scopes = dedup_scopes(&draft.scopes);
        let removed = reconcile::removed_scopes(&scopes, &persisted.scopes);
        let affected = if removed.is_empty() {
            0
        } else {
            reconcile::prune(&removed, tx.clients_of(id).await?).len()
        };

        let replacement = ResourceServer {
            name: draft.name,
            description: draft.description,
            contact_name: draft.contact_name,
            contact_email: draft.contact_email,
            thumbnail_url: draft.thumbnail_url,
            scopes,
            ..persisted.clone()
        };

        // The guarded server write must precede the client writes.
        let saved = tx
            .save_resource_server(&replacement, persisted.version)
            .await?;
        tx.prune_client_scopes(id, &removed).await?;
        tx.commit().await?;

        if removed.is_empty() {
            debug!(resource_server_id = %id, version = saved.version, "Resource server updated");
        } else {
            info!(
                resource_server_id = %id,
                version = saved.version,
                removed = ?removed,
                affected_clients = affected,
                "Resource server updated, scopes removed from clients"
            );
        }

        Ok(saved)
    }

    /// Deletes an owned resource server together with its clients.
    pub async fn delete(&self, id: Uuid, owner: &Owner) -> WardenResult<()> {
        let mut tx = self.transactions.begin().await?;
        if tx.find_resource_server(id, owner).await?.is_none() {
            return Err(WardenError::not_found(ENTITY, id));
        }

        tx.delete_resource_server(id, owner).await?;
        tx.commit().await?;

        info!(resource_server_id = %id, owner = %owner, "Resource server deleted");
        Ok(())
    }
}
