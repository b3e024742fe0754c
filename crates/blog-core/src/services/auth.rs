//! Credential store: signup, login and identity resolution.

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{NewUser, User, UserProfile};
use crate::error::DomainError;
use crate::ports::{PasswordService, TokenService, UserRepository};
use crate::validation;

/// Signup payload. Fields are optional so that absence is reported as a
/// validation failure rather than a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub profile_url: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A sanitized user together with a freshly issued token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: UserProfile,
    pub token: String,
    pub expires_in: i64,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Register a new account and return it with a token.
    pub async fn signup(&self, input: SignupInput) -> Result<AuthSession, DomainError> {
        let name = validation::required("name", "Name", input.name)?;
        let email = validation::required("email", "Email", input.email)?;
        let password = validation::present("password", "Password", input.password)?;
        let profile_url = validation::required("profile_url", "Profile URL", input.profile_url)?;
        let username = validation::required("username", "Username", input.username)?;
        let gender = validation::required("gender", "Gender", input.gender)?;
        let address = validation::required("address", "Address", input.address)?;

        let email = email.trim().to_string();
        let username = username.trim().to_string();
        let profile_url = profile_url.trim().to_string();

        validation::email(&email)?;
        validation::password(&password)?;
        let gender = validation::gender(gender.trim())?;
        validation::username(&username)?;
        validation::profile_url(&profile_url)?;

        if self
            .users
            .find_by_email_or_username(&email, &username)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(
                "User with this email or username already exists".to_string(),
            ));
        }

        let password_hash = self.passwords.hash(&password).await?;

        let user = self
            .users
            .save(User::new(NewUser {
                name: name.trim().to_string(),
                email,
                username,
                password_hash,
                profile_url,
                gender,
                address: address.trim().to_string(),
            }))
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        self.session_for(user)
    }

    /// Exchange email + password for a token.
    ///
    /// An unknown email and a wrong password produce the same error.
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, DomainError> {
        let email = validation::required("email", "Email", input.email)?;
        let password = validation::present("password", "Password", input.password)?;

        let email = email.trim();
        validation::email(email)?;

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        if !self.passwords.verify(&password, &user.password_hash).await? {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(DomainError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "User logged in");

        self.session_for(user)
    }

    /// Resolve a bearer token to the user it was issued for.
    pub async fn authenticate(&self, token: &str) -> Result<UserProfile, DomainError> {
        let claims = self.tokens.validate_token(token)?;

        let user = self
            .users
            .find_by_id(claims.user_id)
            .await?
            .ok_or_else(|| DomainError::Unauthenticated("user no longer exists".to_string()))?;

        Ok(user.into())
    }

    /// Every account except the requester's own.
    pub async fn list_users_except(&self, user_id: Uuid) -> Result<Vec<UserProfile>, DomainError> {
        let users = self.users.list_excluding(user_id).await?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    fn session_for(&self, user: User) -> Result<AuthSession, DomainError> {
        let token = self.tokens.generate_token(user.id)?;

        Ok(AuthSession {
            user: user.into(),
            token,
            expires_in: self.tokens.expiration_seconds(),
        })
    }
}
