//! One-way fingerprints of secret tokens.

use sha2::{Digest, Sha256};

/// SHA-256 hex digest of a raw token. Only fingerprints are ever persisted.
pub fn fingerprint(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
