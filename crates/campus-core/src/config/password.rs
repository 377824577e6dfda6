//! Password policy configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Strength requirements applied to every new password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordPolicyConfig {
    /// Minimum password length in characters.
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    /// Require at least one uppercase letter.
    #[serde(default = "default_true")]
    pub require_uppercase: bool,
    /// Require at least one lowercase letter.
    #[serde(default = "default_true")]
    pub require_lowercase: bool,
    /// Require at least one ASCII digit.
    #[serde(default = "default_true")]
    pub require_digit: bool,
    /// Require at least one non-alphanumeric character.
    #[serde(default = "default_true")]
    pub require_symbol: bool,
    /// Minimum zxcvbn score (0-4). `0` disables the entropy check.
    #[serde(default)]
    pub min_entropy_score: u8,
}

impl PasswordPolicyConfig {
    /// Rejects policies that can never be satisfied or are meaningless.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.min_length == 0 {
            return Err(AppError::configuration(
                "password.min_length must be at least 1",
            ));
        }
        if self.min_entropy_score > 4 {
            return Err(AppError::configuration(
                "password.min_entropy_score must be between 0 and 4",
            ));
        }
        Ok(())
    }
}

impl Default for PasswordPolicyConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_symbol: true,
            min_entropy_score: 0,
        }
    }
}

fn default_min_length() -> usize {
    8
}

fn default_true() -> bool {
    true
}
