//! Error types for the ESTARIA system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EstariaError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Authorization denied: {reason}")]
    AuthorizationDenied { reason: String },

    #[error("Authorization evaluation failed: {0}")]
    Evaluation(String),

    #[error("Role '{name}' is protected and cannot be modified")]
    ProtectedRole { name: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type EstariaResult<T> = Result<T, EstariaError>;
