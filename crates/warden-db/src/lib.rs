//! Warden Database: SurrealDB connection management, schema migrations,
//! repository implementations and buffered transactions.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Owner-scoped repositories ([`repository`])
//! - All-or-nothing units of work ([`SurrealTransactionManager`])
//! - Store error translation ([`DbError`])

mod connection;
mod error;
pub mod repository;
mod schema;
mod transaction;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{run_migrations, schema_v1};
pub use transaction::{SurrealTransaction, SurrealTransactionManager};
