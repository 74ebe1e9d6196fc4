//! Repository and transaction trait definitions for data access
//! abstraction.
//!
//! All operations are async. Resource server lookups are owner-scoped: an
//! entity owned by someone else is reported exactly like a missing one.
//! Writes go through a [`Transaction`] and only become visible on
//! [`Transaction::commit`].

use uuid::Uuid;

use crate::error::WardenResult;
use crate::models::{
    client::{Client, CreateClient},
    owner::Owner,
    resource_server::{NewResourceServer, ResourceServer},
};

// ---------------------------------------------------------------------------
// Resource servers (owner-scoped reads)
// ---------------------------------------------------------------------------

pub trait ResourceServerRepository: Send + Sync {
    /// All resource servers of `owner`, oldest first.
    fn find_by_owner(
        &self,
        owner: &Owner,
    ) -> impl Future<Output = WardenResult<Vec<ResourceServer>>> + Send;

    /// Filters on id and owner in a single query.
    fn find_by_id_and_owner(
        &self,
        id: Uuid,
        owner: &Owner,
    ) -> impl Future<Output = WardenResult<Option<ResourceServer>>> + Send;

    /// Total number of resource servers across all owners.
    fn count(&self) -> impl Future<Output = WardenResult<u64>> + Send;
}

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

/// Client lifecycle belongs to another component; this surface covers what
/// the admin plane needs to keep client scopes consistent.
pub trait ClientRepository: Send + Sync {
    fn create(&self, input: CreateClient) -> impl Future<Output = WardenResult<Client>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = WardenResult<Client>> + Send;
    fn list_by_resource_server(
        &self,
        resource_server_id: Uuid,
    ) -> impl Future<Output = WardenResult<Vec<Client>>> + Send;
}

// ---------------------------------------------------------------------------
// Units of work
// ---------------------------------------------------------------------------

/// Hands out explicit transaction handles.
pub trait TransactionManager: Send + Sync {
    type Tx: Transaction;

    fn begin(&self) -> impl Future<Output = WardenResult<Self::Tx>> + Send;
}

/// One all-or-nothing unit of work.
///
/// Dropping a transaction without calling [`commit`](Transaction::commit)
/// discards every staged write.
pub trait Transaction: Send {
    /// Owner-scoped read performed as part of this unit of work.
    fn find_resource_server(
        &mut self,
        id: Uuid,
        owner: &Owner,
    ) -> impl Future<Output = WardenResult<Option<ResourceServer>>> + Send;

    fn clients_of(
        &mut self,
        resource_server_id: Uuid,
    ) -> impl Future<Output = WardenResult<Vec<Client>>> + Send;

    /// Stages an insert. The store assigns the id, `version` 1 and the
    /// timestamps; the returned entity is what commit will persist.
    fn create_resource_server(
        &mut self,
        input: NewResourceServer,
    ) -> impl Future<Output = WardenResult<ResourceServer>> + Send;

    /// Stages a full replacement of the mutable fields. The write only
    /// applies if the stored version still equals `expected_version`;
    /// otherwise commit fails with a conflict.
    fn save_resource_server(
        &mut self,
        server: &ResourceServer,
        expected_version: u64,
    ) -> impl Future<Output = WardenResult<ResourceServer>> + Send;

    /// Stages deletion of the resource server and its clients.
    fn delete_resource_server(
        &mut self,
        id: Uuid,
        owner: &Owner,
    ) -> impl Future<Output = WardenResult<()>> + Send;

    /// Stages removal of `removed` from every client of the resource server.
    /// The rows to touch are selected when the transaction commits, so a
    /// client granted one of these scopes after [`clients_of`] was read is
    /// pruned as well.
    ///
    /// [`clients_of`]: Transaction::clients_of
    fn prune_client_scopes(
        &mut self,
        resource_server_id: Uuid,
        removed: &[String],
    ) -> impl Future<Output = WardenResult<()>> + Send;

    fn commit(self) -> impl Future<Output = WardenResult<()>> + Send;

    fn rollback(self) -> impl Future<Output = WardenResult<()>> + Send;
}
