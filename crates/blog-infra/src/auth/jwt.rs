//! JWT token service implementation.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use blog_core::ports::{AuthError, TokenClaims, TokenService};

/// Fixed lifetime of every issued token.
pub const TOKEN_TTL_DAYS: i64 = 5;

/// JWT token service configuration.
///
/// A missing secret is not an error at construction; it surfaces as
/// [`AuthError::Configuration`] the first time a token is issued or checked.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: Option<String>,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: None,
            issuer: "blog-api".to_string(),
        }
    }
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty());

        if secret.is_none() {
            tracing::warn!("JWT_SECRET is not set; token issuance and verification will fail");
        }

        Self {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "blog-api".to_string()),
        }
    }
}

/// Internal JWT claims structure for serialization.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user_id
    exp: i64,    // expiration timestamp
    iat: i64,    // issued at
    iss: String, // issuer
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// JWT-based token service (HS256).
pub struct JwtTokenService {
    keys: Option<Keys>,
    issuer: String,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let keys = config.secret.as_deref().map(|secret| Keys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        });

        Self {
            keys,
            issuer: config.issuer,
        }
    }

    fn keys(&self) -> Result<&Keys, AuthError> {
        self.keys.as_ref().ok_or_else(|| {
            tracing::error!("Token operation attempted without JWT_SECRET");
            AuthError::Configuration("JWT secret not configured".to_string())
        })
    }

    fn generate_token_at(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<String, AuthError> {
        let keys = self.keys()?;
        let exp = now + TimeDelta::days(TOKEN_TTL_DAYS);

        let claims = Claims {
            sub: user_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &keys.encoding)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        self.generate_token_at(user_id, Utc::now())
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let keys = self.keys()?;

        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iat", "sub", "iss"]);

        let token_data = decode::<Claims>(token, &keys.decoding, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        let user_id = Uuid::parse_str(&token_data.claims.sub)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(TokenClaims {
            user_id,
            issued_at: token_data.claims.iat,
            expires_at: token_data.claims.exp,
        })
    }

    fn expiration_seconds(&self) -> i64 {
        TimeDelta::days(TOKEN_TTL_DAYS).num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: Some("test-secret-key".to_string()),
            issuer: "test-issuer".to_string(),
        }
    }

    #[test]
    fn test_generate_token_success() {
        let service = JwtTokenService::new(test_config());

        let token = service.generate_token(Uuid::new_v4()).unwrap();

        assert!(!token.is_empty());
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_validate_token_success() {
        let service = JwtTokenService::new(test_config());
        let user_id = Uuid::new_v4();

        let token = service.generate_token(user_id).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.expires_at - claims.issued_at, 5 * 24 * 3600);
    }

    #[test]
    fn test_validate_invalid_token() {
        let service = JwtTokenService::new(test_config());

        let result = service.validate_token("invalid-token");

        assert!(matches!(result.unwrap_err(), AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_token_older_than_five_days_is_rejected() {
        let service = JwtTokenService::new(test_config());
        let issued = Utc::now() - TimeDelta::days(5) - TimeDelta::minutes(5);

        let token = service.generate_token_at(Uuid::new_v4(), issued).unwrap();

        assert!(matches!(
            service.validate_token(&token).unwrap_err(),
            AuthError::TokenExpired
        ));
    }

    #[test]
    fn test_token_just_past_five_days_is_rejected() {
        let service = JwtTokenService::new(test_config());
        let issued = Utc::now() - TimeDelta::days(5) - TimeDelta::seconds(30);

        let token = service.generate_token_at(Uuid::new_v4(), issued).unwrap();

        assert!(matches!(
            service.validate_token(&token).unwrap_err(),
            AuthError::TokenExpired
        ));
    }

    #[test]
    fn test_token_within_window_is_accepted() {
        let service = JwtTokenService::new(test_config());
        let issued = Utc::now() - TimeDelta::days(4);

        let token = service.generate_token_at(Uuid::new_v4(), issued).unwrap();

        assert!(service.validate_token(&token).is_ok());
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let ours = JwtTokenService::new(test_config());
        let theirs = JwtTokenService::new(JwtConfig {
            secret: Some("another-secret".to_string()),
            issuer: "test-issuer".to_string(),
        });

        let token = theirs.generate_token(Uuid::new_v4()).unwrap();

        assert!(matches!(
            ours.validate_token(&token).unwrap_err(),
            AuthError::InvalidToken(_)
        ));
    }

    #[test]
    fn test_validate_wrong_issuer_token() {
        let service1 = JwtTokenService::new(JwtConfig {
            secret: Some("same-secret".to_string()),
            issuer: "issuer1".to_string(),
        });
        let service2 = JwtTokenService::new(JwtConfig {
            secret: Some("same-secret".to_string()),
            issuer: "issuer2".to_string(),
        });

        let token = service1.generate_token(Uuid::new_v4()).unwrap();

        assert!(service2.validate_token(&token).is_err());
    }

    #[test]
    fn test_missing_secret_is_configuration_error() {
        let service = JwtTokenService::new(JwtConfig::default());

        assert!(matches!(
            service.generate_token(Uuid::new_v4()).unwrap_err(),
            AuthError::Configuration(_)
        ));
        assert!(matches!(
            service.validate_token("a.b.c").unwrap_err(),
            AuthError::Configuration(_)
        ));
    }

    #[test]
    fn test_expiration_seconds() {
        let service = JwtTokenService::new(test_config());

        assert_eq!(service.expiration_seconds(), 432_000);
    }
}
