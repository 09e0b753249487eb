//! Argon2id password hashing for the email + password sign-in path.
//!
//! Hashes are stored in PHC format (`$argon2id$v=19$...`) in `users.password_hash`.
//! Argon2 is deliberately slow, so both operations run on the blocking pool.

use anyhow::anyhow;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tokio::task::spawn_blocking;

use crate::errors::AppError;

pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_string();
    spawn_blocking(move || hash_blocking(&password))
        .await
        .map_err(|e| anyhow!("spawn_blocking failed in password hashing: {e}"))?
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is malformed.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let password = password.to_string();
    let hash = hash.to_string();
    spawn_blocking(move || verify_blocking(&password, &hash))
        .await
        .map_err(|e| anyhow!("spawn_blocking failed in password verification: {e}"))?
}

fn hash_blocking(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {e}"))?;
    Ok(hash.to_string())
}

fn verify_blocking(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash).map_err(|e| anyhow!("Invalid password hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
