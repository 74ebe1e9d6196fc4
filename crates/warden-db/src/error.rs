//! Database-specific error types and their translation into the domain
//! taxonomy.

use warden_core::error::WardenError;

/// Marker thrown inside a transaction when a guarded write finds a
/// different revision than the one it was staged against.
pub(crate) const REVISION_CONFLICT: &str = "warden_revision_conflict";

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Malformed record: {0}")]
    Malformed(String),
}

impl From<DbError> for WardenError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => WardenError::NotFound { entity, id },
            DbError::Surreal(e) => classify(e.to_string()),
            DbError::Query(message) => classify(message),
            other => WardenError::Database(other.to_string()),
        }
    }
}

/// Sorts a raw store failure into conflict or transient.
fn classify(message: String) -> WardenError {
    if message.contains(REVISION_CONFLICT) {
        WardenError::Conflict("resource server was modified concurrently".into())
    } else if message.contains("already contains") || message.contains("already exists") {
        WardenError::Conflict(message)
    } else {
        WardenError::Database(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revision_throw_becomes_conflict() {
        let err: WardenError =
            DbError::Query(format!("An error occurred: {REVISION_CONFLICT}")).into();
        assert!(matches!(err, WardenError::Conflict(_)));
    }

    #[test]
    fn unique_index_violation_becomes_conflict() {
        let err: WardenError = DbError::Query(
            "Database index `idx_resource_server_key` already contains 'abc'".into(),
        )
        .into();
        assert!(matches!(err, WardenError::Conflict(_)));
    }

    #[test]
    fn unknown_failure_is_transient() {
        let err: WardenError = DbError::Query("connection reset".into()).into();
        assert!(matches!(err, WardenError::Database(_)));

        let err: WardenError = DbError::Malformed("invalid UUID".into()).into();
        assert!(matches!(err, WardenError::Database(_)));
    }

    #[test]
    fn not_found_is_preserved() {
        let err: WardenError = DbError::NotFound {
            entity: "oauth_client".into(),
            id: "x".into(),
        }
        .into();
        assert!(matches!(err, WardenError::NotFound { .. }));
    }
}
