use anyhow::Context;
use thiserror::Error;
use tracing::{debug, info};

use crate::auth::{
    password::{hash_password, verify_password},
    repo::UserStore,
    repo_types::{User, ADMIN_ROLE},
};
use crate::config::AdminSeed;
use crate::error::StoreError;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("User not found")]
    UnknownUser,
    #[error("Incorrect password")]
    WrongPassword,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("stored password hash is unusable: {0}")]
    BadHash(anyhow::Error),
    #[error("password check did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Stateless pass/fail check. Nothing is issued on success.
pub async fn check_credentials(
    users: &dyn UserStore,
    email: &str,
    password: &str,
) -> Result<User, CredentialError> {
    let email = normalize_email(email);
    let user = users
        .find_by_email(&email)
        .await?
        .ok_or(CredentialError::UnknownUser)?;

    // Argon2 is CPU-bound; keep it off the async workers.
    let plain = password.to_owned();
    let stored = user.password_hash.clone();
    let ok = tokio::task::spawn_blocking(move || verify_password(&plain, &stored))
        .await?
        .map_err(CredentialError::BadHash)?;
    if !ok {
        return Err(CredentialError::WrongPassword);
    }
    debug!(user_id = %user.id, "credentials verified");
    Ok(user)
}

#[derive(Debug)]
pub enum SeedOutcome {
    Created(User),
    AlreadyExists,
}

/// Creates the admin credential unless a user with that email already exists.
pub async fn seed_admin(users: &dyn UserStore, seed: &AdminSeed) -> anyhow::Result<SeedOutcome> {
    let email = normalize_email(&seed.email);
    if users
        .find_by_email(&email)
        .await
        .context("look up admin user")?
        .is_some()
    {
        info!(email = %email, "admin user already exists; skipping seed");
        return Ok(SeedOutcome::AlreadyExists);
    }

    let plain = seed.password.clone();
    let hash = tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .context("join password hashing task")??;
    let user = users
        .create(&email, &hash, ADMIN_ROLE)
        .await
        .context("insert admin user")?;
    info!(
        user_id = %user.id,
        email = %user.email,
        role = %user.role,
        created_at = %user.created_at,
        "admin user created"
    );
    Ok(SeedOutcome::Created(user))
}
