//! Invitation configuration.

use serde::{Deserialize, Serialize};

use super::bounded_days;
use crate::error::AppError;

/// Upper bound for `ttl_days`.
pub const MAX_INVITATION_TTL_DAYS: u64 = 3650;

/// Settings for admin-issued invitations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationConfig {
    /// Days an invitation stays redeemable.
    #[serde(default = "default_ttl_days")]
    pub ttl_days: u64,
    /// Base URL of the registration page; the raw token is appended as a path segment.
    #[serde(default = "default_link_base_url")]
    pub link_base_url: String,
}

impl InvitationConfig {
    /// Invitation lifetime, capped at [`MAX_INVITATION_TTL_DAYS`].
    pub fn ttl(&self) -> chrono::Duration {
        bounded_days(self.ttl_days, MAX_INVITATION_TTL_DAYS)
    }

    /// Builds the registration link for a raw invitation token.
    pub fn link_for(&self, token: &str) -> String {
        format!("{}/{}", self.link_base_url.trim_end_matches('/'), token)
    }

    /// Rejects a zero or out-of-range lifetime.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.ttl_days == 0 {
            return Err(AppError::configuration(
                "invitation.ttl_days must be positive",
            ));
        }
        if self.ttl_days > MAX_INVITATION_TTL_DAYS {
            return Err(AppError::configuration(format!(
                "invitation.ttl_days must not exceed {MAX_INVITATION_TTL_DAYS}"
            )));
        }
        Ok(())
    }
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self {
            ttl_days: default_ttl_days(),
            link_base_url: default_link_base_url(),
        }
    }
}

fn default_ttl_days() -> u64 {
    7
}

fn default_link_base_url() -> String {
    "http://localhost:3000/invite".to_string()
}
