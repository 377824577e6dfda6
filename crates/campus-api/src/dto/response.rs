//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_auth::{AdminCertificate, IssuedInvitation};
use campus_entity::session::TokenPair;
use campus_entity::user::{User, UserRole, UserStatus};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// User summary for responses. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Email.
    pub email: Option<String>,
    /// Role.
    pub role: UserRole,
    /// Status.
    pub status: UserStatus,
    /// Teacher record, for students.
    pub teacher_ref: Option<String>,
    /// Created at.
    pub created_at: DateTime<Utc>,
    /// Last login.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            status: user.status,
            teacher_ref: user.teacher_ref.clone(),
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

/// An access/refresh pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPairResponse {
    /// Access token.
    pub access_token: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token.
    pub refresh_token: String,
    /// Refresh token expiration.
    pub refresh_expires_at: DateTime<Utc>,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token.token,
            access_expires_at: pair.access_token.expires_at,
            refresh_token: pair.refresh_token.token,
            refresh_expires_at: pair.refresh_token.expires_at,
        }
    }
}

/// Login or registration response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Session the tokens belong to.
    pub session_id: Uuid,
    /// Token pair.
    #[serde(flatten)]
    pub tokens: TokenPairResponse,
    /// User info.
    pub user: UserResponse,
}

/// Bootstrap response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapResponse {
    /// The administrator.
    pub user: UserResponse,
    /// Long-lived admin token.
    pub admin_token: String,
    /// Admin token expiration.
    pub admin_token_expires_at: DateTime<Utc>,
    /// Session the tokens belong to.
    pub session_id: Uuid,
    /// First session's token pair, flattened like [`LoginResponse`].
    #[serde(flatten)]
    pub tokens: TokenPairResponse,
    /// Signed administrator certificate.
    pub certificate: AdminCertificate,
    /// Where the keypair was written, if writing succeeded.
    pub key_directory: Option<String>,
}

/// Issued invitation. The token is returned once and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationResponse {
    /// Invitation ID.
    pub id: Uuid,
    /// Invitee email.
    pub email: String,
    /// Role granted on completion.
    pub role: UserRole,
    /// Teacher record, for students.
    pub teacher_ref: Option<String>,
    /// Raw invitation token.
    pub token: String,
    /// Link to deliver to the invitee.
    pub link: String,
    /// Expiration.
    pub expires_at: DateTime<Utc>,
}

impl From<IssuedInvitation> for InvitationResponse {
    fn from(issued: IssuedInvitation) -> Self {
        Self {
            id: issued.invitation.id,
            email: issued.invitation.email,
            role: issued.invitation.role,
            teacher_ref: issued.invitation.teacher_ref,
            token: issued.token,
            link: issued.link,
            expires_at: issued.expires_at,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Message plus an affected-row count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    /// Message.
    pub message: String,
    /// Count value.
    pub count: u64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Database reachability.
    pub database: String,
    /// Uptime.
    pub uptime_seconds: u64,
}
