//! Password hashing.
//!
//! Credentials are Argon2id PHC strings (`$argon2id$v=19$...`) carrying their
//! own salt and parameters.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand_core::OsRng;

use crate::error::{CoreError, Result};

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CoreError::InvalidArgument(format!("password could not be hashed: {e}")))?;
    Ok(hash.to_string())
}

/// Parse a stored credential.
pub fn parse_credential(stored: &str) -> Result<PasswordHash<'_>> {
    PasswordHash::new(stored).map_err(|_| CoreError::MalformedCredential)
}

/// Check a password against a stored credential. Malformed blobs never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match parse_credential(stored) {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}
