//! Password hashing for stored users.
//!
//! Only hashing lives here; nothing in the service authenticates callers.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Shortest password accepted when creating a user.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Errors raised while hashing a password.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Password shorter than [`MIN_PASSWORD_LEN`].
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    TooShort,

    /// Argon2 failed.
    #[error("failed to hash password: {0}")]
    Hash(String),
}

/// Hashes a password with Argon2id into a PHC string.
///
/// # Errors
///
/// Returns `TooShort` for short passwords and `Hash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordError::TooShort);
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}
