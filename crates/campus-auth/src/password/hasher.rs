//! Argon2id password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use crate::error::AuthError;

/// Longest accepted password, in bytes.
pub const MAX_PASSWORD_BYTES: usize = 1024;

/// Argon2id memory cost in KiB.
const MEMORY_COST_KIB: u32 = 19_456;
/// Argon2id iteration count.
const TIME_COST: u32 = 2;
/// Argon2id lanes.
const PARALLELISM: u32 = 1;

/// Hash compared against when the username does not exist.
///
/// Same algorithm and work factor as real hashes, so a verification costs
/// exactly one real check. No password produces it.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$xGIQJn8vSxLFbru+tTjGDQ$31g/XIrKkytHNWDHcUvP6cwa3iwcrsEC8H2Ucs9y1+0";

/// Handles password hashing and verification using Argon2id.
///
/// The work factor is fixed (m=19456 KiB, t=2, p=1). Both hashing and
/// verification are CPU-bound; async callers use the `*_async` variants,
/// which run on the blocking thread pool.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Creates a new password hasher instance.
    pub fn new() -> Self {
        let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
            .unwrap_or_default();
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Hashes a plaintext password using Argon2id with a random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        check_length(password)?;

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored Argon2id hash.
    ///
    /// The parameters embedded in the stored hash are used, so hashes made
    /// with an older work factor still verify.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<(), AuthError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash format: {e}")))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(()),
            Err(argon2::password_hash::Error::Password) => Err(AuthError::Mismatch),
            Err(e) => Err(AuthError::Internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }

    /// Burns one verification against a fixed hash.
    ///
    /// Called when the username is unknown so that the response takes as
    /// long as a real password check.
    pub fn verify_dummy(&self, password: &str) {
        let _ = self.verify_password(password, DUMMY_HASH);
    }

    /// [`Self::hash_password`] on the blocking thread pool.
    pub async fn hash_password_async(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("Password hashing task failed: {e}")))?
    }

    /// [`Self::verify_password`] on the blocking thread pool.
    pub async fn verify_password_async(&self, password: &str, hash: &str) -> Result<(), AuthError> {
        let hasher = self.clone();
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || hasher.verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(format!("Password verification task failed: {e}")))?
    }

    /// [`Self::verify_dummy`] on the blocking thread pool.
    pub async fn verify_dummy_async(&self, password: &str) {
        let hasher = self.clone();
        let password = password.to_string();
        let _ = tokio::task::spawn_blocking(move || hasher.verify_dummy(&password)).await;
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

fn check_length(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::WeakSecret {
            missing: vec!["at least one character".to_string()],
        });
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AuthError::WeakSecret {
            missing: vec![format!("at most {MAX_PASSWORD_BYTES} bytes")],
        });
    }
    Ok(())
}
