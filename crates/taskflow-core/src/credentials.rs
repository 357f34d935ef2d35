//! Password hashing and password-reset tokens
//!
//! Passwords are stored as argon2 PHC strings. Reset tokens are random and
//! only their SHA-256 digest is persisted.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sha2::{Digest, Sha256};
use taskflow_core_types::Sensitive;
use uuid::Uuid;

use crate::errors::{Result, TaskflowError};

pub const MIN_PASSWORD_LEN: usize = 8;

/// # Errors
/// `WeakPassword` when shorter than [`MIN_PASSWORD_LEN`] or lacking a
/// letter or a digit.
pub fn check_strength(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(TaskflowError::WeakPassword {
            reason: format!("must be at least {MIN_PASSWORD_LEN} characters"),
        });
    }
    let has_letter = password.chars().any(char::is_alphabetic);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_letter && has_digit) {
        return Err(TaskflowError::WeakPassword {
            reason: "must contain a letter and a digit".to_string(),
        });
    }
    Ok(())
}

/// Hash a password into an argon2id PHC string.
///
/// # Errors
/// `Internal` if the hasher fails.
pub fn hash_password(password: &Sensitive<String>) -> Result<Sensitive<String>> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.expose().as_bytes(), &salt)
        .map(|hash| Sensitive::new(hash.to_string()))
        .map_err(|e| TaskflowError::Internal {
            message: format!("password hashing failed: {e}"),
        })
}

/// # Errors
/// `Internal` when the stored hash is not a valid PHC string.
pub fn verify_password(password: &Sensitive<String>, stored_hash: &Sensitive<String>) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash.expose()).map_err(|e| TaskflowError::Internal {
        message: format!("stored password hash is malformed: {e}"),
    })?;
    Ok(Argon2::default()
        .verify_password(password.expose().as_bytes(), &parsed)
        .is_ok())
}

/// Fresh single-use reset token, handed to the user once.
pub fn new_reset_token() -> Sensitive<String> {
    Sensitive::new(Uuid::new_v4().simple().to_string())
}

/// Digest under which a reset token is stored and looked up.
pub fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.trim().as_bytes()))
}
