//! Store error types.

use std::fmt;

use campus_core::error::{AppError, ErrorKind};
use thiserror::Error;

/// A uniqueness rule enforced by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    /// Case-insensitive username.
    Username,
    /// Case-insensitive email address.
    Email,
    /// Refresh token fingerprint.
    SessionFingerprint,
    /// Invitation token fingerprint.
    InvitationFingerprint,
    /// The one-time bootstrap marker.
    BootstrapMarker,
}

impl UniqueField {
    /// Resolve the field from the name of the violated constraint or index.
    pub fn from_constraint(name: &str) -> Option<Self> {
        match name {
            "users_username_key" => Some(Self::Username),
            "users_email_key" => Some(Self::Email),
            "sessions_refresh_token_hash_key" => Some(Self::SessionFingerprint),
            "invitations_token_hash_key" => Some(Self::InvitationFingerprint),
            "bootstrap_state_pkey" => Some(Self::BootstrapMarker),
            _ => None,
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::SessionFingerprint => "session fingerprint",
            Self::InvitationFingerprint => "invitation fingerprint",
            Self::BootstrapMarker => "bootstrap marker",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by every store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness rule was violated.
    #[error("Unique constraint violated: {0}")]
    Conflict(UniqueField),
    /// The backend failed for a reason unrelated to the caller's input.
    #[error("{message}")]
    Backend {
        /// What the store was doing.
        message: String,
        /// Underlying cause.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StoreError {
    /// Create a backend error with an underlying cause.
    pub fn backend(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Backend {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(field) => AppError::conflict(format!("Duplicate {field}")),
            StoreError::Backend { message, source } => AppError {
                kind: ErrorKind::Database,
                message,
                source,
            },
        }
    }
}

/// Map a sqlx error, resolving unique violations from the constraint name.
pub(crate) fn map_sqlx(context: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |err| {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                if let Some(field) = db_err.constraint().and_then(UniqueField::from_constraint) {
                    return StoreError::Conflict(field);
                }
            }
        }
        StoreError::backend(context, err)
    }
}
