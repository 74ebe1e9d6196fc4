//! Warden Admin: resource server management, scope reconciliation,
//! credential issuance and caller identity resolution.

pub mod config;
pub mod credentials;
pub mod identity;
pub mod manager;
pub mod reconcile;
pub mod validation;

pub use config::AdminConfig;
pub use credentials::{CredentialGenerator, RandomCredentialGenerator};
pub use identity::{CallerContext, IdentityResolver, PrincipalIdentityResolver};
pub use manager::ResourceServerManager;
