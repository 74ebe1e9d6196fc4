//! Domain models for Warden.
//!
//! Resource servers are owned by an [`owner::Owner`]; clients hang off a
//! resource server and hold a subset of its scopes.

pub mod client;
pub mod owner;
pub mod resource_server;
