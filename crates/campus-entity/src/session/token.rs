//! Token value types for JWT access and refresh tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An issued JWT access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    /// The raw JWT string.
    pub token: String,
    /// When the token stops verifying.
    pub expires_at: DateTime<Utc>,
}

/// An issued JWT refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshToken {
    /// The raw JWT string.
    pub token: String,
    /// When the token (and its session row) expires.
    pub expires_at: DateTime<Utc>,
}

/// A pair of access and refresh tokens bound to one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// The access token.
    pub access_token: AccessToken,
    /// The refresh token.
    pub refresh_token: RefreshToken,
}
