//! Identity lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identities are deactivated, never hard-deleted.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    /// Still resolvable by id, but refused at login and refresh.
    Inactive,
}

impl UserStatus {
    pub fn can_login(self) -> bool {
        self == Self::Active
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        })
    }
}
