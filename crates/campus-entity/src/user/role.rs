//! Campus roles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role carried by an identity and by every token issued for it.
///
/// Variants are declared from least to most privileged, so the derived
/// ordering is the privilege ordering: `Student < Teacher < Admin`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Attached to a teacher record.
    Student,
    /// Manages their own students.
    Teacher,
    /// Only ever created by bootstrap.
    Admin,
}

impl UserRole {
    /// Whether this role grants at least `minimum`.
    pub fn satisfies(self, minimum: UserRole) -> bool {
        self >= minimum
    }

    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }

    /// Roles an invitation may grant.
    pub fn is_invitable(self) -> bool {
        !self.is_admin()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
