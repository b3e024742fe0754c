//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`:
//! PostgreSQL repositories via SeaORM, in-memory repositories, JWT tokens
//! and Argon2 password hashing.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `auth` - JWT + Argon2 authentication

pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::{DatabaseConfig, InMemoryBlogRepository, InMemoryUserRepository};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

// Re-exports - PostgreSQL
#[cfg(feature = "postgres")]
pub use database::{PostgresBlogRepository, PostgresUserRepository, connect};
