use anyhow::anyhow;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use rand_core::OsRng;
use thiserror::Error;

use crate::cache::CacheError;

mod articles;
mod tokens;
mod users;

pub use articles::*;
pub use tokens::{Claims, TokenError, TokenKeys};
pub use users::{LoginOutcome, login, register_user};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),
    #[error("authentication failed")]
    AuthError,
    #[error("{0}")]
    AlreadyExists(String),
    #[error("database error {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("cache error {0}")]
    CacheError(#[from] CacheError),
    #[error("token error {0}")]
    TokenError(#[from] TokenError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Hash with a fresh random salt, producing a PHC string
pub(crate) fn hash_password(password: &str, hasher: &Argon2<'_>) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
