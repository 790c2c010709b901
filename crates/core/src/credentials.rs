//! Argon2id password hashing, verification, and strength validation.
//!
//! Every hash uses the Argon2id variant with a fresh salt drawn from [`OsRng`]
//! and is stored in PHC string format, so the parameters and salt travel with
//! the digest. The cost parameters are fixed here and are never caller-supplied.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

/// Argon2 memory cost in KiB.
pub const MEMORY_COST_KIB: u32 = 19_456;
/// Argon2 iteration count.
pub const TIME_COST: u32 = 2;
/// Argon2 lanes.
pub const PARALLELISM: u32 = 1;

/// Minimum password length enforced on signup and password change.
pub const MIN_PASSWORD_LENGTH: usize = 12;

/// Failures of the credential codec.
///
/// A password that simply does not match is *not* an error; see
/// [`verify_password`].
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// The hashing library failed (bad parameters, RNG failure, ...).
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// The stored digest could not be parsed or uses unsupported parameters.
    #[error("stored password digest is malformed: {0}")]
    Verification(String),
}

fn hasher() -> Result<Argon2<'static>, CredentialError> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
        .map_err(|e| CredentialError::Hashing(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CredentialError::Hashing(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted digest.
///
/// Returns `Ok(true)` on a match and `Ok(false)` on a mismatch. Only a digest
/// that cannot be parsed yields [`CredentialError::Verification`].
pub fn verify_password(digest: &str, password: &str) -> Result<bool, CredentialError> {
    let parsed =
        PasswordHash::new(digest).map_err(|e| CredentialError::Verification(e.to_string()))?;
    match hasher()?.verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CredentialError::Verification(e.to_string())),
    }
}

/// Digest checked when the account does not exist, so a miss costs a full
/// Argon2 verification like a hit does.
static DUMMY_DIGEST: OnceLock<Option<String>> = OnceLock::new();

fn dummy_digest() -> Option<&'static str> {
    DUMMY_DIGEST
        .get_or_init(|| hash_password("gatehouse-unknown-account").ok())
        .as_deref()
}

/// Run a verification whose outcome is discarded.
pub fn verify_dummy(password: &str) {
    if let Some(digest) = dummy_digest() {
        let _ = verify_password(digest, password);
    }
}

/// Validate that a password meets minimum strength requirements.
///
/// Returns `Err` with a human-readable explanation when it does not.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.chars().count() < min_length {
        return Err(format!(
            "Password must be at least {min_length} characters long"
        ));
    }
    Ok(())
}
