//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate, overlaid by `CAMPUS__*` environment variables. Each
//! sub-module represents a logical configuration section.

pub mod app;
pub mod auth;
pub mod database;
pub mod invitation;
pub mod keys;
pub mod logging;
pub mod password;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::auth::AuthConfig;
pub use self::database::DatabaseConfig;
pub use self::invitation::InvitationConfig;
pub use self::keys::KeyConfig;
pub use self::logging::LoggingConfig;
pub use self::password::PasswordPolicyConfig;

use crate::error::AppError;

/// Minimum accepted length of the token signing secret, in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

/// Minimum accepted RSA modulus size for the administrator keypair.
pub const MIN_RSA_BITS: usize = 2048;

/// `days` as a duration, never longer than `max` days and never negative.
pub(crate) fn bounded_days(days: u64, max: u64) -> chrono::Duration {
    i64::try_from(days.min(max))
        .ok()
        .and_then(chrono::Duration::try_days)
        .unwrap_or(chrono::Duration::MAX)
}

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Token signing and lifetime settings.
    pub auth: AuthConfig,
    /// Password strength policy.
    #[serde(default)]
    pub password: PasswordPolicyConfig,
    /// Invitation settings.
    #[serde(default)]
    pub invitation: InvitationConfig,
    /// Administrator keypair settings.
    #[serde(default)]
    pub keys: KeyConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `config/default.toml`, `config/{env}.toml`
    /// and `CAMPUS__*` environment variables.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from_dir(Path::new("config"), env)
    }

    /// Load configuration from the given directory.
    ///
    /// Both files are optional; later sources override earlier ones.
    pub fn load_from_dir(dir: &Path, env: &str) -> Result<Self, AppError> {
        let default_path = dir.join("default");
        let env_path = dir.join(env);
        let default_name = default_path.to_string_lossy();
        let env_name = env_path.to_string_lossy();

        let config = config::Config::builder()
            .add_source(config::File::with_name(&default_name).required(false))
            .add_source(config::File::with_name(&env_name).required(false))
            .add_source(
                config::Environment::with_prefix("CAMPUS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        parsed.validate()?;
        Ok(parsed)
    }

    /// Check invariants that must hold before the process starts serving.
    pub fn validate(&self) -> Result<(), AppError> {
        self.auth.validate()?;
        self.password.validate()?;
        self.invitation.validate()?;
        self.keys.validate()?;

        if self.database.url.trim().is_empty() {
            return Err(AppError::configuration("database.url must be set"));
        }

        Ok(())
    }
}
