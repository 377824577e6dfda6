//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;
use super::status::UserStatus;

/// A registered identity: an administrator, a teacher or a student.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique login name (case-insensitive).
    pub username: String,
    /// Email address (optional, unique when present).
    pub email: Option<String>,
    /// Argon2id password hash in PHC format.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// User role (RBAC).
    pub role: UserRole,
    /// Account status.
    pub status: UserStatus,
    /// Teacher record a student belongs to. Only set for students.
    pub teacher_ref: Option<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Check if the user can log in right now.
    pub fn can_login(&self) -> bool {
        self.status.can_login()
    }

    /// Check if this user has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Data required to create a new user.
///
/// The id is generated by the caller so that tokens bound to the user can be
/// issued before the row is written in the same transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Pre-generated user ID.
    pub id: Uuid,
    /// Desired username.
    pub username: String,
    /// Email address (optional).
    pub email: Option<String>,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Assigned role.
    pub role: UserRole,
    /// Teacher record reference (students only).
    pub teacher_ref: Option<String>,
}

impl CreateUser {
    /// Materialize the row this request would produce, as of `now`.
    pub fn into_user(self, now: DateTime<Utc>) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role,
            status: UserStatus::Active,
            teacher_ref: self.teacher_ref,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }
}
