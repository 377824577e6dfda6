//! Typed failures of the authentication services.

use campus_core::error::{AppError, ErrorKind};
use campus_database::{StoreError, UniqueField};
use thiserror::Error;

/// Why a bearer token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// `exp` is in the past, beyond the configured leeway.
    #[error("Token has expired")]
    Expired,
    /// The signature or the algorithm did not match.
    #[error("Invalid token signature")]
    BadSignature,
    /// The token could not be decoded, or its claims are unusable.
    #[error("Malformed token")]
    Malformed,
    /// The `token_type` claim is not one the caller accepts.
    #[error("Unexpected token type")]
    WrongType,
}

/// Errors returned by the authentication services.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A password does not satisfy the policy. Lists every unmet requirement.
    #[error("Password must contain {}", .missing.join(", "))]
    WeakSecret {
        /// Human-readable requirements that were not met.
        missing: Vec<String>,
    },
    /// The password does not match the stored hash.
    #[error("Password does not match")]
    Mismatch,
    /// Caller input failed validation.
    #[error("{0}")]
    InvalidInput(String),
    /// A bearer token was rejected.
    #[error(transparent)]
    Token(#[from] TokenError),
    /// Unknown username or wrong password. Deliberately indistinguishable.
    #[error("Invalid username or password")]
    InvalidCredentials,
    /// The account exists but is deactivated.
    #[error("Account is inactive")]
    Inactive,
    /// The refresh token is unknown, rotated away or revoked.
    #[error("Refresh token is invalid or has been revoked")]
    InvalidOrRevoked,
    /// Missing or unusable credentials.
    #[error("Authentication required")]
    Unauthorized,
    /// Authenticated, but not allowed.
    #[error("Insufficient permissions")]
    Forbidden,
    /// Bootstrap already ran.
    #[error("System is already initialized")]
    AlreadyInitialized,
    /// No invitation matches the token.
    #[error("Invitation not found or expired")]
    InvitationNotFound,
    /// The invitation exists but expired. Reported exactly like not found.
    #[error("Invitation not found or expired")]
    InvitationExpired,
    /// The invitation was already redeemed.
    #[error("Invitation has already been used")]
    AlreadyUsed,
    /// The username is taken.
    #[error("Username is already taken")]
    UsernameTaken,
    /// The email address is already registered.
    #[error("Email address is already registered")]
    EmailTaken,
    /// Key generation, signing or persistence failed.
    #[error("Key operation failed: {0}")]
    Key(String),
    /// The store failed.
    #[error(transparent)]
    Store(StoreError),
    /// Any other failure not attributable to the caller.
    #[error("{0}")]
    Internal(String),
}

impl AuthError {
    /// The application error kind this failure maps to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::WeakSecret { .. } | Self::InvalidInput(_) => ErrorKind::Validation,
            Self::Mismatch
            | Self::Token(_)
            | Self::InvalidCredentials
            | Self::InvalidOrRevoked
            | Self::Unauthorized => ErrorKind::Unauthorized,
            Self::Inactive | Self::Forbidden => ErrorKind::Forbidden,
            Self::InvitationNotFound | Self::InvitationExpired => ErrorKind::NotFound,
            Self::AlreadyInitialized
            | Self::AlreadyUsed
            | Self::UsernameTaken
            | Self::EmailTaken => ErrorKind::Conflict,
            Self::Store(StoreError::Conflict(_)) => ErrorKind::Conflict,
            Self::Store(StoreError::Backend { .. }) => ErrorKind::Database,
            Self::Key(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(UniqueField::Username) => Self::UsernameTaken,
            StoreError::Conflict(UniqueField::Email) => Self::EmailTaken,
            StoreError::Conflict(UniqueField::BootstrapMarker) => Self::AlreadyInitialized,
            other => Self::Store(other),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        match err {
            AuthError::Store(source) => AppError::with_source(kind, message, source),
            _ => AppError::new(kind, message),
        }
    }
}
