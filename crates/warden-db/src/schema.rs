//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Generated credentials carry UNIQUE
//! indexes so that a collision is rejected by the store.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::{debug, info};

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1: initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Resource servers (owner scope)
-- =======================================================================
DEFINE TABLE resource_server SCHEMAFULL;
DEFINE FIELD owner ON TABLE resource_server TYPE string;
DEFINE FIELD server_key ON TABLE resource_server TYPE string;
DEFINE FIELD server_secret ON TABLE resource_server TYPE string;
DEFINE FIELD name ON TABLE resource_server TYPE string;
DEFINE FIELD description ON TABLE resource_server TYPE option<string>;
DEFINE FIELD contact_name ON TABLE resource_server TYPE option<string>;
DEFINE FIELD contact_email ON TABLE resource_server \
    TYPE option<string>;
DEFINE FIELD thumbnail_url ON TABLE resource_server \
    TYPE option<string>;
DEFINE FIELD scopes ON TABLE resource_server TYPE array;
DEFINE FIELD scopes.* ON TABLE resource_server TYPE string;
DEFINE FIELD revision ON TABLE resource_server TYPE int DEFAULT 1;
DEFINE FIELD created_at ON TABLE resource_server TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE resource_server TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_resource_server_key ON TABLE resource_server \
    COLUMNS server_key UNIQUE;
DEFINE INDEX idx_resource_server_secret ON TABLE resource_server \
    COLUMNS server_secret UNIQUE;
DEFINE INDEX idx_resource_server_owner ON TABLE resource_server \
    COLUMNS owner;

-- =======================================================================
-- OAuth clients (scoped to a resource server)
-- =======================================================================
DEFINE TABLE oauth_client SCHEMAFULL;
DEFINE FIELD resource_server_id ON TABLE oauth_client TYPE string;
DEFINE FIELD client_id ON TABLE oauth_client TYPE string;
DEFINE FIELD name ON TABLE oauth_client TYPE string;
DEFINE FIELD scopes ON TABLE oauth_client TYPE array;
DEFINE FIELD scopes.* ON TABLE oauth_client TYPE string;
DEFINE FIELD created_at ON TABLE oauth_client TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE oauth_client TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_oauth_client_client_id ON TABLE oauth_client \
    COLUMNS client_id UNIQUE;
DEFINE INDEX idx_oauth_client_resource_server ON TABLE oauth_client \
    COLUMNS resource_server_id;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies each
/// migration whose version exceeds the current maximum. A migration and its
/// tracking record commit together, so a failed migration leaves neither
/// behind and is retried on the next start.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Tracking table first; safe to repeat.
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let current_version = current_version(db).await?;
    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|m| m.version > current_version)
        .collect();

    if pending.is_empty() {
        debug!(version = current_version, "Schema is up to date");
        return Ok(());
    }

    for migration in pending {
        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );

        let batch = format!(
            "BEGIN TRANSACTION;\n{}\n\
             CREATE _migration SET version = $version, name = $name;\n\
             COMMIT TRANSACTION;",
            migration.sql
        );
        db.query(batch)
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "v{} '{}' rolled back: {e}",
                    migration.version, migration.name,
                ))
            })?;

        info!(version = migration.version, "Migration applied");
    }

    Ok(())
}

/// Highest applied migration version, 0 on a fresh database.
async fn current_version<C: Connection>(db: &Surreal<C>) -> Result<u32, DbError> {
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    Ok(records.first().map(|m| m.version).unwrap_or(0))
}

/// Returns the raw schema DDL for version 1, for inspection in tests and
/// tooling that bootstraps a store without the runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
