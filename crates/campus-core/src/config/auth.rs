//! Authentication configuration.

use serde::{Deserialize, Serialize};

use super::{MIN_SECRET_BYTES, bounded_days};
use crate::error::AppError;

/// Upper bound for `access_ttl_minutes` (one day).
pub const MAX_ACCESS_TTL_MINUTES: u64 = 24 * 60;
/// Upper bound for `refresh_ttl_days`.
pub const MAX_REFRESH_TTL_DAYS: u64 = 3650;
/// Upper bound for `admin_token_ttl_days`.
pub const MAX_ADMIN_TTL_DAYS: u64 = 36500;

/// Token signing and lifetime configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for token signing (HMAC-SHA256). No default: must be supplied.
    pub jwt_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token (and session row) TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
    /// Admin token TTL in days. Issued once, at bootstrap.
    #[serde(default = "default_admin_ttl")]
    pub admin_token_ttl_days: u64,
    /// Clock skew tolerated when checking `exp`/`nbf`, in seconds.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
}

impl AuthConfig {
    /// Creates a configuration with the given secret and default lifetimes.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_days: default_refresh_ttl(),
            admin_token_ttl_days: default_admin_ttl(),
            leeway_seconds: default_leeway(),
        }
    }

    /// Access token lifetime, capped at [`MAX_ACCESS_TTL_MINUTES`].
    pub fn access_ttl(&self) -> chrono::Duration {
        // The cap keeps the cast lossless.
        chrono::Duration::minutes(self.access_ttl_minutes.min(MAX_ACCESS_TTL_MINUTES) as i64)
    }

    /// Refresh token lifetime, capped at [`MAX_REFRESH_TTL_DAYS`].
    pub fn refresh_ttl(&self) -> chrono::Duration {
        bounded_days(self.refresh_ttl_days, MAX_REFRESH_TTL_DAYS)
    }

    /// Admin token lifetime, capped at [`MAX_ADMIN_TTL_DAYS`].
    pub fn admin_token_ttl(&self) -> chrono::Duration {
        bounded_days(self.admin_token_ttl_days, MAX_ADMIN_TTL_DAYS)
    }

    /// Rejects a missing or short secret and lifetimes that are zero or out of range.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.len() < MIN_SECRET_BYTES {
            return Err(AppError::configuration(format!(
                "auth.jwt_secret must be at least {MIN_SECRET_BYTES} bytes"
            )));
        }
        if self.access_ttl_minutes == 0 || self.refresh_ttl_days == 0 {
            return Err(AppError::configuration(
                "auth.access_ttl_minutes and auth.refresh_ttl_days must be positive",
            ));
        }
        if self.admin_token_ttl_days == 0 {
            return Err(AppError::configuration(
                "auth.admin_token_ttl_days must be positive",
            ));
        }
        if self.access_ttl_minutes > MAX_ACCESS_TTL_MINUTES {
            return Err(AppError::configuration(format!(
                "auth.access_ttl_minutes must not exceed {MAX_ACCESS_TTL_MINUTES}"
            )));
        }
        if self.refresh_ttl_days > MAX_REFRESH_TTL_DAYS {
            return Err(AppError::configuration(format!(
                "auth.refresh_ttl_days must not exceed {MAX_REFRESH_TTL_DAYS}"
            )));
        }
        if self.admin_token_ttl_days > MAX_ADMIN_TTL_DAYS {
            return Err(AppError::configuration(format!(
                "auth.admin_token_ttl_days must not exceed {MAX_ADMIN_TTL_DAYS}"
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .field("admin_token_ttl_days", &self.admin_token_ttl_days)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    7
}

fn default_admin_ttl() -> u64 {
    3650
}

fn default_leeway() -> u64 {
    5
}
