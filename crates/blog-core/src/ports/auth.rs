//! Authentication ports.

use async_trait::async_trait;
use uuid::Uuid;

/// Claims carried by an identity token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Token service trait for JWT operations.
pub trait TokenService: Send + Sync {
    /// Issue a signed token for a user.
    fn generate_token(&self, user_id: Uuid) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of issued tokens.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service. Implementations are CPU-bound and must not
/// block the async executor.
#[async_trait]
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    async fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Hashing error: {0}")]
    HashingError(String),
}
