//! Authentication implementations.

mod jwt;
mod password;

pub use jwt::{JwtConfig, JwtTokenService, TOKEN_TTL_DAYS};
pub use password::Argon2PasswordService;
