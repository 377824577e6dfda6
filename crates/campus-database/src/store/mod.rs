//! Store traits consumed by the authentication services.
//!
//! Every operation that must read and write atomically (redemption,
//! rotation, bootstrap) is a single trait method so that implementations can
//! run it inside one transaction.

pub mod error;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use campus_entity::invitation::{CreateInvitation, Invitation};
use campus_entity::session::{CreateSession, Session};
use campus_entity::user::{CreateUser, User, UserStatus};

pub use self::error::{StoreError, StoreResult, UniqueField};

/// Identity (user) persistence.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Insert a new identity. Duplicate username or email yields a conflict.
    async fn create_identity(&self, data: CreateUser) -> StoreResult<User>;

    /// Find an identity by primary key.
    async fn find_identity_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Find an identity by username (case-insensitive).
    async fn find_identity_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Find an identity by email (case-insensitive).
    async fn find_identity_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Record a successful login.
    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()>;

    /// Change the account status. Returns `false` when the identity does not exist.
    async fn set_identity_status(&self, id: Uuid, status: UserStatus) -> StoreResult<bool>;
}

/// Refresh session persistence.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a new session row.
    async fn create_session(&self, data: CreateSession) -> StoreResult<Session>;

    /// Find the unexpired session whose refresh fingerprint matches exactly.
    async fn find_session_by_fingerprint(&self, fingerprint: &str)
    -> StoreResult<Option<Session>>;

    /// Atomically delete the unexpired session of `user_id` matching
    /// `old_fingerprint` and insert `next`.
    ///
    /// Returns `None`, creating nothing, when no such session exists.
    async fn rotate_session(
        &self,
        user_id: Uuid,
        old_fingerprint: &str,
        next: CreateSession,
    ) -> StoreResult<Option<Session>>;

    /// Delete one session belonging to `user_id`. Returns whether a row was removed.
    async fn delete_session(&self, user_id: Uuid, session_id: Uuid) -> StoreResult<bool>;

    /// Delete every session of `user_id`. Returns the number removed.
    async fn delete_sessions_for_identity(&self, user_id: Uuid) -> StoreResult<u64>;
}

/// Fields of the identity created by an invitation redemption.
///
/// Role, email and teacher reference are taken from the invitation row.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    /// Pre-generated user ID.
    pub user_id: Uuid,
    /// Desired username.
    pub username: String,
    /// Argon2id hash of the chosen password.
    pub password_hash: String,
}

/// Result of a redemption attempt.
#[derive(Debug, Clone)]
pub enum RedeemOutcome {
    /// The invitation was consumed and the identity and session were created.
    Redeemed {
        /// The new identity.
        user: User,
        /// Its initial session.
        session: Session,
        /// The consumed invitation.
        invitation: Invitation,
    },
    /// No invitation has this fingerprint.
    NotFound,
    /// The invitation expired before it was used.
    Expired,
    /// The invitation was already redeemed.
    AlreadyUsed,
}

/// Invitation persistence.
#[async_trait]
pub trait InvitationStore: Send + Sync {
    /// Insert a new invitation.
    async fn create_invitation(&self, data: CreateInvitation) -> StoreResult<Invitation>;

    /// Find an invitation by token fingerprint, regardless of state.
    async fn find_invitation_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> StoreResult<Option<Invitation>>;

    /// In one transaction: mark the invitation used if it is unused and
    /// unexpired, create the identity from it, and create its first session.
    ///
    /// `session.user_id` must equal `registration.user_id`.
    async fn redeem_invitation(
        &self,
        fingerprint: &str,
        registration: NewRegistration,
        session: CreateSession,
    ) -> StoreResult<RedeemOutcome>;
}

/// Result of a bootstrap attempt.
#[derive(Debug, Clone)]
pub enum BootstrapOutcome {
    /// This call created the administrator.
    Created {
        /// The administrator identity.
        user: User,
        /// Its initial session.
        session: Session,
    },
    /// The system was already initialized; nothing was written.
    AlreadyInitialized,
}

/// One-time administrator bootstrap persistence.
#[async_trait]
pub trait BootstrapStore: Send + Sync {
    /// Whether the bootstrap marker exists.
    async fn is_initialized(&self) -> StoreResult<bool>;

    /// In one transaction: write the marker, create the administrator and
    /// its first session. At most one call ever returns `Created`.
    async fn create_bootstrap_admin(
        &self,
        admin: CreateUser,
        session: CreateSession,
    ) -> StoreResult<BootstrapOutcome>;
}
