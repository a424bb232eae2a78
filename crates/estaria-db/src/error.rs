//! Database-specific error types and conversions.

use estaria_core::error::EstariaError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Conflict: {entity} already exists")]
    Conflict { entity: String },

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl DbError {
    /// Classify a statement failure: unique-index violations become
    /// conflicts, everything else a query failure.
    pub(crate) fn from_check(entity: &str, err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        if msg.contains("already contains") {
            DbError::Conflict {
                entity: entity.into(),
            }
        } else {
            DbError::Query(msg)
        }
    }
}

impl From<DbError> for EstariaError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => EstariaError::NotFound { entity, id },
            DbError::Conflict { entity } => EstariaError::AlreadyExists { entity },
            other => EstariaError::Database(other.to_string()),
        }
    }
}
