//! SurrealDB repository implementations.

mod client;
mod resource_server;

pub use client::SurrealClientRepository;
pub use resource_server::SurrealResourceServerRepository;

pub(crate) use client::select_by_resource_server;
pub(crate) use resource_server::select_by_id_and_owner;
