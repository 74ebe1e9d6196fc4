//! Warden Server: admin HTTP surface for resource servers.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerArgs;
pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
