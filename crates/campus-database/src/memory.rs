//! In-memory store using a Tokio mutex, for tests and single-process demos.
//!
//! Implements the same uniqueness and atomicity rules as the PostgreSQL
//! store. Every operation holds the one state lock for its whole duration.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use campus_entity::invitation::{CreateInvitation, Invitation};
use campus_entity::session::{CreateSession, Session};
use campus_entity::user::{CreateUser, User, UserStatus};

use crate::store::{
    BootstrapOutcome, BootstrapStore, IdentityStore, InvitationStore, NewRegistration,
    RedeemOutcome, SessionStore, StoreError, StoreResult, UniqueField,
};

/// Internal state for the memory store.
#[derive(Debug, Default)]
struct InnerState {
    users: HashMap<Uuid, User>,
    sessions: HashMap<Uuid, Session>,
    invitations: HashMap<Uuid, Invitation>,
    /// Set once by the first successful bootstrap.
    bootstrapped_by: Option<Uuid>,
}

impl InnerState {
    fn check_user_unique(&self, data: &CreateUser) -> StoreResult<()> {
        let username = data.username.to_lowercase();
        let email = data.email.as_deref().map(str::to_lowercase);

        for user in self.users.values() {
            if user.username.to_lowercase() == username {
                return Err(StoreError::Conflict(UniqueField::Username));
            }
            if email.is_some() && user.email.as_deref().map(str::to_lowercase) == email {
                return Err(StoreError::Conflict(UniqueField::Email));
            }
        }
        Ok(())
    }

    fn insert_user(&mut self, data: CreateUser, now: DateTime<Utc>) -> StoreResult<User> {
        self.check_user_unique(&data)?;
        let user = data.into_user(now);
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn check_session_unique(&self, data: &CreateSession) -> StoreResult<()> {
        if self
            .sessions
            .values()
            .any(|s| s.refresh_token_hash == data.refresh_token_hash)
        {
            return Err(StoreError::Conflict(UniqueField::SessionFingerprint));
        }
        Ok(())
    }

    fn insert_session(&mut self, data: CreateSession, now: DateTime<Utc>) -> StoreResult<Session> {
        self.check_session_unique(&data)?;
        let session = data.into_session(now);
        self.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    fn invitation_by_fingerprint(&self, fingerprint: &str) -> Option<&Invitation> {
        self.invitations
            .values()
            .find(|i| i.token_hash == fingerprint)
    }
}

/// In-memory implementation of every store trait.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Protected inner state.
    state: Arc<Mutex<InnerState>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of identities with the given role. Test helper.
    pub async fn count_users_with_role(&self, role: campus_entity::user::UserRole) -> usize {
        let state = self.state.lock().await;
        state.users.values().filter(|u| u.role == role).count()
    }

    /// Number of live sessions for a user. Test helper.
    pub async fn count_sessions(&self, user_id: Uuid) -> usize {
        let state = self.state.lock().await;
        state
            .sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .count()
    }

    /// Move an invitation's expiry into the past. Test helper.
    pub async fn expire_invitation(&self, id: Uuid) {
        let mut state = self.state.lock().await;
        if let Some(invitation) = state.invitations.get_mut(&id) {
            invitation.expires_at = Utc::now() - chrono::Duration::seconds(1);
        }
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn create_identity(&self, data: CreateUser) -> StoreResult<User> {
        let mut state = self.state.lock().await;
        state.insert_user(data, Utc::now())
    }

    async fn find_identity_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_identity_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let state = self.state.lock().await;
        let username = username.to_lowercase();
        Ok(state
            .users
            .values()
            .find(|u| u.username.to_lowercase() == username)
            .cloned())
    }

    async fn find_identity_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.lock().await;
        let email = email.to_lowercase();
        Ok(state
            .users
            .values()
            .find(|u| u.email.as_deref().map(str::to_lowercase).as_deref() == Some(email.as_str()))
            .cloned())
    }

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        if let Some(user) = state.users.get_mut(&id) {
            user.last_login_at = Some(at);
            user.updated_at = at;
        }
        Ok(())
    }

    async fn set_identity_status(&self, id: Uuid, status: UserStatus) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        Ok(match state.users.get_mut(&id) {
            Some(user) => {
                user.status = status;
                user.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create_session(&self, data: CreateSession) -> StoreResult<Session> {
        let mut state = self.state.lock().await;
        state.insert_session(data, Utc::now())
    }

    async fn find_session_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> StoreResult<Option<Session>> {
        let state = self.state.lock().await;
        Ok(state
            .sessions
            .values()
            .find(|s| s.refresh_token_hash == fingerprint && !s.is_expired())
            .cloned())
    }

    async fn rotate_session(
        &self,
        user_id: Uuid,
        old_fingerprint: &str,
        next: CreateSession,
    ) -> StoreResult<Option<Session>> {
        let mut state = self.state.lock().await;
        let now = Utc::now();

        let Some(old_id) = state
            .sessions
            .values()
            .find(|s| {
                s.refresh_token_hash == old_fingerprint && s.user_id == user_id && s.expires_at > now
            })
            .map(|s| s.id)
        else {
            return Ok(None);
        };

        state.check_session_unique(&next)?;
        state.sessions.remove(&old_id);
        state.insert_session(next, now).map(Some)
    }

    async fn delete_session(&self, user_id: Uuid, session_id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        let owned = state
            .sessions
            .get(&session_id)
            .is_some_and(|s| s.user_id == user_id);
        if owned {
            state.sessions.remove(&session_id);
        }
        Ok(owned)
    }

    async fn delete_sessions_for_identity(&self, user_id: Uuid) -> StoreResult<u64> {
        let mut state = self.state.lock().await;
        let before = state.sessions.len();
        state.sessions.retain(|_, s| s.user_id != user_id);
        Ok((before - state.sessions.len()) as u64)
    }
}

#[async_trait]
impl InvitationStore for MemoryStore {
    async fn create_invitation(&self, data: CreateInvitation) -> StoreResult<Invitation> {
        let mut state = self.state.lock().await;
        if state.invitation_by_fingerprint(&data.token_hash).is_some() {
            return Err(StoreError::Conflict(UniqueField::InvitationFingerprint));
        }
        let invitation = data.into_invitation(Utc::now());
        state.invitations.insert(invitation.id, invitation.clone());
        Ok(invitation)
    }

    async fn find_invitation_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> StoreResult<Option<Invitation>> {
        let state = self.state.lock().await;
        Ok(state.invitation_by_fingerprint(fingerprint).cloned())
    }

    async fn redeem_invitation(
        &self,
        fingerprint: &str,
        registration: NewRegistration,
        session: CreateSession,
    ) -> StoreResult<RedeemOutcome> {
        let mut state = self.state.lock().await;
        let now = Utc::now();

        let Some(current) = state.invitation_by_fingerprint(fingerprint).cloned() else {
            return Ok(RedeemOutcome::NotFound);
        };
        if current.used {
            return Ok(RedeemOutcome::AlreadyUsed);
        }
        if current.expires_at <= now {
            return Ok(RedeemOutcome::Expired);
        }

        // Validate every write before applying any, so a conflict leaves
        // the state untouched.
        let new_user = CreateUser {
            id: registration.user_id,
            username: registration.username,
            email: Some(current.email.clone()),
            password_hash: registration.password_hash,
            role: current.role,
            teacher_ref: current.teacher_ref.clone(),
        };
        state.check_user_unique(&new_user)?;
        state.check_session_unique(&session)?;

        let user = state.insert_user(new_user, now)?;
        let session = state.insert_session(session, now)?;

        let mut invitation = current;
        invitation.used = true;
        invitation.used_at = Some(now);
        invitation.used_by = Some(user.id);
        state.invitations.insert(invitation.id, invitation.clone());

        Ok(RedeemOutcome::Redeemed {
            user,
            session,
            invitation,
        })
    }
}

#[async_trait]
impl BootstrapStore for MemoryStore {
    async fn is_initialized(&self) -> StoreResult<bool> {
        let state = self.state.lock().await;
        Ok(state.bootstrapped_by.is_some())
    }

    async fn create_bootstrap_admin(
        &self,
        admin: CreateUser,
        session: CreateSession,
    ) -> StoreResult<BootstrapOutcome> {
        let mut state = self.state.lock().await;
        if state.bootstrapped_by.is_some() {
            return Ok(BootstrapOutcome::AlreadyInitialized);
        }

        let now = Utc::now();
        state.check_user_unique(&admin)?;
        state.check_session_unique(&session)?;

        let user = state.insert_user(admin, now)?;
        let session = state.insert_session(session, now)?;
        state.bootstrapped_by = Some(user.id);

        Ok(BootstrapOutcome::Created { user, session })
    }
}
