//! Account password hashing.
//!
//! Hashes are bcrypt strings (`$2b$<cost>$...`) stored in `users.hashed_password`.
//! A stored value that is not a bcrypt hash is a data problem, not a wrong
//! password, and surfaces as `AppError::InternalServerError`.

use crate::error::AppError;
use bcrypt::{hash, verify, DEFAULT_COST};
use log::error;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    Ok(hash(password, DEFAULT_COST)?)
}

/// `Ok(false)` for a wrong password; `Err` when `hashed_password` cannot be read.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password).map_err(|e| {
        error!("Stored password hash is unusable: {}", e);
        AppError::InternalServerError("Failed to verify password".into())
    })
}
