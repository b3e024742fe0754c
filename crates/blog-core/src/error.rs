//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::ports::AuthError;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Invalid tags: {}. Allowed tags: {}", .invalid.join(", "), crate::domain::Tag::allowed())]
    InvalidTags { invalid: Vec<String> },

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Not authenticated: {0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Server configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(entity_type: &'static str, id: Uuid) -> Self {
        DomainError::NotFound { entity_type, id }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Constraint(msg) => DomainError::Conflict(msg),
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenExpired | AuthError::InvalidToken(_) => {
                DomainError::Unauthenticated(err.to_string())
            }
            AuthError::Configuration(msg) => DomainError::Configuration(msg),
            AuthError::HashingError(msg) => DomainError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_tags_message_names_offenders() {
        let err = DomainError::InvalidTags {
            invalid: vec!["cooking".into(), "music".into()],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Invalid tags: cooking, music."));
        assert!(msg.contains("sports"));
    }

    #[test]
    fn test_constraint_becomes_conflict() {
        let err: DomainError = RepoError::Constraint("users_email_key".into()).into();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn test_token_failures_become_unauthenticated() {
        let err: DomainError = AuthError::TokenExpired.into();
        assert!(matches!(err, DomainError::Unauthenticated(_)));

        let err: DomainError = AuthError::InvalidToken("bad signature".into()).into();
        assert!(matches!(err, DomainError::Unauthenticated(_)));

        let err: DomainError = AuthError::HashingError("bad phc".into()).into();
        assert!(matches!(err, DomainError::Internal(_)));

        let err: DomainError = AuthError::Configuration("JWT_SECRET not set".into()).into();
        assert!(matches!(err, DomainError::Configuration(_)));
    }
}
