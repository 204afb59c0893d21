//! Credential hashing.

use crate::domain::foundation::{DomainError, ErrorCode};

/// Hashes and verifies passwords with bcrypt.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// `cost` is the bcrypt work factor; configuration enforces >= 10.
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, DomainError> {
        bcrypt::hash(password, self.cost).map_err(|e| {
            DomainError::new(ErrorCode::InternalError, "Password hashing failed")
                .with_detail("source", e.to_string())
        })
    }

    /// Returns Ok(true) on a match, Ok(false) on a mismatch. A corrupt
    /// stored hash is an internal error, not a mismatch.
    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, DomainError> {
        bcrypt::verify(password, stored_hash).map_err(|e| {
            DomainError::new(ErrorCode::InternalError, "Password verification failed")
                .with_detail("source", e.to_string())
        })
    }
}
