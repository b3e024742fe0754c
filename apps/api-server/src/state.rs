//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::{BlogRepository, PasswordService, TokenService, UserRepository};
use blog_core::services::{AuthService, BlogService};
use blog_infra::{
    Argon2PasswordService, InMemoryBlogRepository, InMemoryUserRepository, JwtTokenService,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub blogs: Arc<BlogService>,
}

impl AppState {
    /// Build the application state, backed by PostgreSQL when a database is
    /// configured and by in-memory repositories otherwise.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));

        #[cfg(feature = "postgres")]
        if let Some(db_config) = &config.database {
            use blog_infra::{PostgresBlogRepository, PostgresUserRepository};

            let conn = Arc::new(blog_infra::connect(db_config).await?);
            let users = Arc::new(PostgresUserRepository::new(Arc::clone(&conn)));
            let blogs = Arc::new(PostgresBlogRepository::new(conn));

            tracing::info!("Application state initialized (postgres)");
            return Ok(Self::assemble(users, blogs, tokens));
        }

        #[cfg(not(feature = "postgres"))]
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        }

        tracing::warn!("Running with in-memory repositories; data is lost on restart.");
        Ok(Self::in_memory(tokens))
    }

    /// State over fresh in-memory repositories.
    pub fn in_memory(tokens: Arc<dyn TokenService>) -> Self {
        Self::assemble(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryBlogRepository::new()),
            tokens,
        )
    }

    /// In-memory state signing tokens with the given configuration.
    #[cfg(test)]
    pub fn for_tests(jwt: blog_infra::JwtConfig) -> Self {
        Self::in_memory(Arc::new(JwtTokenService::new(jwt)))
    }

    fn assemble(
        users: Arc<dyn UserRepository>,
        blogs: Arc<dyn BlogRepository>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        Self {
            auth: Arc::new(AuthService::new(users.clone(), passwords, tokens)),
            blogs: Arc::new(BlogService::new(blogs, users)),
        }
    }
}
