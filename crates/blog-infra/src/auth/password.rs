//! Argon2 password hashing implementation.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use async_trait::async_trait;

use blog_core::ports::{AuthError, PasswordService};

/// Memory cost in KiB.
pub const MEMORY_COST_KIB: u32 = 19 * 1024;
/// Number of passes.
pub const TIME_COST: u32 = 2;
pub const PARALLELISM: u32 = 1;

/// Argon2id password service with a fixed cost.
///
/// Each hash carries its own random salt and its parameters in PHC string
/// format, so verification keeps working if the cost is raised later.
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
            .unwrap_or_default();

        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PasswordService for Argon2PasswordService {
    async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let hashed = tokio::task::spawn_blocking({
            let argon2 = self.argon2.clone();
            let password = password.to_owned();
            move || {
                let salt = SaltString::generate(&mut OsRng);
                argon2
                    .hash_password(password.as_bytes(), &salt)
                    .map(|h| h.to_string())
            }
        })
        .await
        .map_err(|e| AuthError::HashingError(e.to_string()))?;

        hashed.map_err(|e| AuthError::HashingError(e.to_string()))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        // Malformed hashes are rejected before leaving the executor.
        PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;

        tokio::task::spawn_blocking({
            let argon2 = self.argon2.clone();
            let password = password.to_owned();
            let hash = hash.to_owned();
            move || -> Result<bool, argon2::password_hash::Error> {
                let parsed_hash = PasswordHash::new(&hash)?;
                Ok(argon2
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok())
            }
        })
        .await
        .map_err(|e| AuthError::HashingError(e.to_string()))?
        .map_err(|e| AuthError::HashingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let service = Argon2PasswordService::new();

        let hash = service.hash("secret1").await.unwrap();
        assert!(service.verify("secret1", &hash).await.unwrap());
        assert!(!service.verify("secret2", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_same_password_gets_distinct_salts() {
        let service = Argon2PasswordService::new();

        let first = service.hash("secret1").await.unwrap();
        let second = service.hash("secret1").await.unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$v=19$m=19456,t=2,p=1$"));
    }

    #[tokio::test]
    async fn test_verify_rejects_malformed_hash() {
        let service = Argon2PasswordService::new();

        assert!(matches!(
            service.verify("secret1", "not-a-phc-string").await,
            Err(AuthError::HashingError(_))
        ));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_hashing_leaves_executor_free() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let service = Argon2PasswordService::new();
        let ticks = Arc::new(AtomicUsize::new(0));

        let ticker = tokio::spawn({
            let ticks = ticks.clone();
            async move {
                loop {
                    ticks.fetch_add(1, Ordering::Relaxed);
                    tokio::task::yield_now().await;
                }
            }
        });

        service.hash("secret1").await.unwrap();
        ticker.abort();

        assert!(ticks.load(Ordering::Relaxed) > 0);
    }
}
