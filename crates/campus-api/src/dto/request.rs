//! Request DTOs with validation.
//!
//! These checks only catch missing fields; the auth services apply the
//! username, email and password policies.

use serde::{Deserialize, Serialize};
use validator::Validate;

use campus_entity::user::UserRole;

/// Bootstrap request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BootstrapRequest {
    /// Administrator username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Administrator password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Optional contact email.
    #[serde(default)]
    pub email: Option<String>,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    /// Refresh token.
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Invitation creation request (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateInvitationRequest {
    /// Invitee email.
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    /// Role granted on completion: `teacher` or `student`.
    pub role: UserRole,
    /// Teacher record the student belongs to.
    #[serde(default)]
    pub teacher_ref: Option<String>,
}

/// Invitation completion request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompleteInvitationRequest {
    /// Chosen username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Chosen password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}
