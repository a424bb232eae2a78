//! Authorization error types.

use estaria_core::error::EstariaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("evaluation failed: {0}")]
    Evaluation(String),

    #[error("malformed rule conditions: {0}")]
    MalformedRule(String),

    #[error("invalid access request: {0}")]
    InvalidRequest(String),

    #[error("role '{name}' is protected and cannot be modified")]
    ProtectedRole { name: String },
}

impl From<AuthzError> for EstariaError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::ProtectedRole { name } => EstariaError::ProtectedRole { name },
            AuthzError::InvalidRequest(msg) => EstariaError::Validation { message: msg },
            other => EstariaError::Evaluation(other.to_string()),
        }
    }
}
