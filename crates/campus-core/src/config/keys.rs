//! Administrator keypair configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::MIN_RSA_BITS;
use crate::error::AppError;

/// Where and how the bootstrap administrator keypair is produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyConfig {
    /// Restricted-access directory receiving the private key, public key and certificate.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    /// RSA modulus size in bits.
    #[serde(default = "default_rsa_bits")]
    pub rsa_bits: usize,
}

impl KeyConfig {
    /// Rejects key sizes below the accepted minimum.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.rsa_bits < MIN_RSA_BITS {
            return Err(AppError::configuration(format!(
                "keys.rsa_bits must be at least {MIN_RSA_BITS}"
            )));
        }
        Ok(())
    }
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            rsa_bits: default_rsa_bits(),
        }
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from("data/keys")
}

fn default_rsa_bits() -> usize {
    3072
}
