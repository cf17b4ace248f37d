use argon2::{Argon2, PasswordHash, PasswordVerifier};
use serde::Serialize;

use crate::{
    domain::{User, UserName, UserPassword},
    services::{ServiceError, TokenKeys},
    store::UserStore,
};

use super::hash_password;

const DUPLICATE_USERNAME: &str = "User with this username already exists";

#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub access_token: String,
    pub user: User,
}

#[tracing::instrument(name = "services::register_user", skip_all, fields(username = username.as_str()))]
pub async fn register_user(
    username: UserName,
    password: UserPassword,
    hasher: &Argon2<'_>,
    store: &dyn UserStore,
) -> Result<User, ServiceError> {
    if store.find_by_username(username.as_str()).await?.is_some() {
        return Err(ServiceError::AlreadyExists(DUPLICATE_USERNAME.to_string()));
    }

    let hash = hash_password(password.as_str(), hasher)?;

    // A concurrent registration can still win the unique constraint
    let user = store
        .insert(&username, &hash)
        .await?
        .ok_or_else(|| ServiceError::AlreadyExists(DUPLICATE_USERNAME.to_string()))?;

    tracing::info!(id = %user.id, "user registered");
    Ok(user)
}

/// Verify credentials and issue an access token.
///
/// Unknown users and wrong passwords both yield `ServiceError::AuthError`.
#[tracing::instrument(name = "services::login", skip_all, fields(username = %username))]
pub async fn login(
    username: &str,
    password: &str,
    hasher: &Argon2<'_>,
    store: &dyn UserStore,
    tokens: &TokenKeys,
) -> Result<LoginOutcome, ServiceError> {
    let Some(record) = store.find_by_username(username).await? else {
        tracing::debug!("unknown username");
        return Err(ServiceError::AuthError);
    };

    let hash = PasswordHash::new(&record.password_hash)
        .map_err(|e| anyhow::anyhow!("invalid password hash: {e}"))
        .map_err(ServiceError::Other)?;

    if hasher.verify_password(password.as_bytes(), &hash).is_err() {
        tracing::debug!("password mismatch");
        return Err(ServiceError::AuthError);
    }

    let user = record.to_user();
    let access_token = tokens.issue(&user)?;

    Ok(LoginOutcome { access_token, user })
}
