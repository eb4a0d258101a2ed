//! Salted password hashing. Verification always goes through the algorithm's
//! own verify routine, which compares digests in constant time.

use argon2::{
    password_hash::{self, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use rand::rngs::OsRng;
use std::sync::OnceLock;

use super::errors::AuthError;

/// Hash algorithm recognised from the stored hash prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashScheme {
    Argon2,
    Bcrypt,
}

impl HashScheme {
    pub fn detect(hash: &str) -> Option<Self> {
        if hash.starts_with("$argon2") {
            Some(HashScheme::Argon2)
        } else if ["$2a$", "$2b$", "$2x$", "$2y$"].iter().any(|p| hash.starts_with(p)) {
            Some(HashScheme::Bcrypt)
        } else {
            None
        }
    }
}

/// Hash a password with argon2 and a fresh random salt, returning a PHC string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string();
    Ok(hash)
}

/// Argon2 hash checked against when no account matches the email, so an
/// unknown account costs the same verify as a wrong password.
pub fn decoy_hash() -> &'static str {
    static DECOY: OnceLock<String> = OnceLock::new();
    DECOY.get_or_init(|| hash_password("decoy-account-password").unwrap_or_default())
}

/// Check `password` against a stored argon2 or bcrypt hash.
///
/// `Ok(false)` is a plain mismatch; `Err` means the stored hash itself
/// could not be parsed or uses an unsupported scheme.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    match HashScheme::detect(stored_hash) {
        Some(HashScheme::Argon2) => {
            let parsed = PasswordHash::new(stored_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
            match Argon2::default().verify_password(password.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(password_hash::Error::Password) => Ok(false),
                Err(e) => Err(AuthError::HashError(e.to_string())),
            }
        }
        Some(HashScheme::Bcrypt) => {
            bcrypt::verify(password, stored_hash).map_err(|e| AuthError::HashError(e.to_string()))
        }
        None => Err(AuthError::HashError("unsupported password hash format".into())),
    }
}
