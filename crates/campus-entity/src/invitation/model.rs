//! Invitation entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::user::UserRole;

/// An admin-issued, single-use invitation to register.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invitation {
    /// Unique invitation identifier, carried as the token subject.
    pub id: Uuid,
    /// SHA-256 hex digest of the invitation token.
    #[serde(skip_serializing, default)]
    pub token_hash: String,
    /// Email address the invitation was sent to.
    pub email: String,
    /// Role the new user will receive.
    pub role: UserRole,
    /// Teacher record reference. Required for students.
    pub teacher_ref: Option<String>,
    /// The admin who issued the invitation.
    pub invited_by: Uuid,
    /// Whether the invitation has been redeemed.
    pub used: bool,
    /// When the invitation was redeemed.
    pub used_at: Option<DateTime<Utc>>,
    /// The user created by the redemption.
    pub used_by: Option<Uuid>,
    /// When the invitation was created.
    pub created_at: DateTime<Utc>,
    /// When the invitation stops being redeemable.
    pub expires_at: DateTime<Utc>,
}

impl Invitation {
    /// Check whether the invitation has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Check whether the invitation can still be redeemed.
    pub fn is_redeemable(&self) -> bool {
        !self.used && !self.is_expired()
    }
}

/// Data required to create a new invitation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvitation {
    /// Pre-generated invitation ID matching the token subject.
    pub id: Uuid,
    /// SHA-256 hex digest of the invitation token.
    pub token_hash: String,
    /// Invitee email address (normalized).
    pub email: String,
    /// Role the new user will receive.
    pub role: UserRole,
    /// Teacher record reference (students only).
    pub teacher_ref: Option<String>,
    /// The issuing admin.
    pub invited_by: Uuid,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
}

impl CreateInvitation {
    /// Materialize the row this request would produce, as of `now`.
    pub fn into_invitation(self, now: DateTime<Utc>) -> Invitation {
        Invitation {
            id: self.id,
            token_hash: self.token_hash,
            email: self.email,
            role: self.role,
            teacher_ref: self.teacher_ref,
            invited_by: self.invited_by,
            used: false,
            used_at: None,
            used_by: None,
            created_at: now,
            expires_at: self.expires_at,
        }
    }
}
