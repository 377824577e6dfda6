//! Admin-issued invitations.
//!
//! The raw token is an invitation-type JWT whose subject is the invitation
//! id. It is returned once, at creation. Only its fingerprint is stored.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use campus_core::config::InvitationConfig;
use campus_database::{IdentityStore, InvitationStore, NewRegistration, RedeemOutcome};
use campus_entity::invitation::{CreateInvitation, Invitation};
use campus_entity::session::{Session, TokenPair};
use campus_entity::user::{User, UserRole};

use crate::error::{AuthError, TokenError};
use crate::fingerprint::fingerprint;
use crate::jwt::{JwtDecoder, JwtEncoder, TokenType};
use crate::password::{PasswordHasher, PasswordValidator};
use crate::session::prepare_session;
use crate::validation::{normalize_email, validate_username};

/// A newly created invitation and the raw token, shown exactly once.
#[derive(Debug, Clone)]
pub struct IssuedInvitation {
    /// The stored invitation.
    pub invitation: Invitation,
    /// Raw invitation token.
    pub token: String,
    /// Registration link embedding the token.
    pub link: String,
    /// When the invitation stops being redeemable.
    pub expires_at: DateTime<Utc>,
}

/// Public view of an invitation.
#[derive(Debug, Clone, Serialize)]
pub struct InvitationSummary {
    /// Invitation ID.
    pub id: Uuid,
    /// Invitee email address.
    pub email: String,
    /// Role offered.
    pub role: UserRole,
    /// Teacher record reference (students only).
    pub teacher_ref: Option<String>,
    /// Whether the invitation was redeemed.
    pub used: bool,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
}

impl From<&Invitation> for InvitationSummary {
    fn from(invitation: &Invitation) -> Self {
        Self {
            id: invitation.id,
            email: invitation.email.clone(),
            role: invitation.role,
            teacher_ref: invitation.teacher_ref.clone(),
            used: invitation.used,
            expires_at: invitation.expires_at,
        }
    }
}

/// Result of completing an invitation.
#[derive(Debug, Clone)]
pub struct RegistrationResult {
    /// The new identity.
    pub user: User,
    /// Its initial session.
    pub session: Session,
    /// Access and refresh tokens for that session.
    pub tokens: TokenPair,
}

/// Issues and redeems invitations.
#[derive(Clone)]
pub struct InvitationService {
    invitations: Arc<dyn InvitationStore>,
    identities: Arc<dyn IdentityStore>,
    jwt_encoder: Arc<JwtEncoder>,
    jwt_decoder: Arc<JwtDecoder>,
    password_hasher: PasswordHasher,
    password_validator: PasswordValidator,
    config: InvitationConfig,
}

impl std::fmt::Debug for InvitationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvitationService")
            .field("config", &self.config)
            .finish()
    }
}

impl InvitationService {
    /// Creates the service.
    pub fn new(
        invitations: Arc<dyn InvitationStore>,
        identities: Arc<dyn IdentityStore>,
        jwt_encoder: Arc<JwtEncoder>,
        jwt_decoder: Arc<JwtDecoder>,
        password_hasher: PasswordHasher,
        password_validator: PasswordValidator,
        config: InvitationConfig,
    ) -> Self {
        Self {
            invitations,
            identities,
            jwt_encoder,
            jwt_decoder,
            password_hasher,
            password_validator,
            config,
        }
    }

    /// Creates an invitation. The caller must already be authorized as admin.
    ///
    /// Students require a teacher reference; teachers must not carry one.
    /// Administrators cannot be invited.
    pub async fn create(
        &self,
        admin_id: Uuid,
        email: &str,
        role: UserRole,
        teacher_ref: Option<&str>,
    ) -> Result<IssuedInvitation, AuthError> {
        let email = normalize_email(email)?;
        let teacher_ref = teacher_ref
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        match (role, &teacher_ref) {
            (r, _) if !r.is_invitable() => {
                return Err(AuthError::InvalidInput(
                    "Administrators cannot be invited".to_string(),
                ));
            }
            (UserRole::Student, None) => {
                return Err(AuthError::InvalidInput(
                    "A teacher reference is required for student invitations".to_string(),
                ));
            }
            (UserRole::Teacher, Some(_)) => {
                return Err(AuthError::InvalidInput(
                    "A teacher reference is only allowed for student invitations".to_string(),
                ));
            }
            _ => {}
        }

        if self.identities.find_identity_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let id = Uuid::now_v7();
        let issued = self.jwt_encoder.issue(
            id,
            role,
            TokenType::Invitation,
            self.config.ttl(),
            None,
        )?;

        let invitation = self
            .invitations
            .create_invitation(CreateInvitation {
                id,
                token_hash: fingerprint(&issued.token),
                email,
                role,
                teacher_ref,
                invited_by: admin_id,
                expires_at: issued.expires_at,
            })
            .await?;

        info!(
            invitation_id = %invitation.id,
            invited_by = %admin_id,
            role = %role,
            "Invitation created"
        );

        Ok(IssuedInvitation {
            link: self.config.link_for(&issued.token),
            expires_at: invitation.expires_at,
            invitation,
            token: issued.token,
        })
    }

    /// Looks up an invitation without consuming it.
    ///
    /// Unknown, forged, malformed and expired tokens are all reported as
    /// not found or expired, with identical messages.
    pub async fn fetch(&self, token: &str) -> Result<InvitationSummary, AuthError> {
        let invitation = self.lookup(token).await?;
        Ok(InvitationSummary::from(&invitation))
    }

    /// Redeems an invitation, creating the identity and its first session.
    pub async fn complete(
        &self,
        token: &str,
        username: &str,
        password: &str,
    ) -> Result<RegistrationResult, AuthError> {
        let invitation = self.lookup(token).await?;

        let username = validate_username(username)?;
        self.password_validator
            .validate_with_context(password, &[username.as_str(), invitation.email.as_str()])?;

        if self
            .identities
            .find_identity_by_username(&username)
            .await?
            .is_some()
        {
            return Err(AuthError::UsernameTaken);
        }

        let password_hash = self.password_hasher.hash_password_async(password).await?;

        let user_id = Uuid::now_v7();
        let prepared = prepare_session(&self.jwt_encoder, user_id, invitation.role)?;

        let outcome = self
            .invitations
            .redeem_invitation(
                &fingerprint(token),
                NewRegistration {
                    user_id,
                    username,
                    password_hash,
                },
                prepared.record,
            )
            .await?;

        match outcome {
            RedeemOutcome::Redeemed { user, session, .. } => {
                info!(
                    invitation_id = %invitation.id,
                    user_id = %user.id,
                    role = %user.role,
                    "Invitation completed"
                );
                Ok(RegistrationResult {
                    user,
                    session,
                    tokens: prepared.tokens,
                })
            }
            RedeemOutcome::AlreadyUsed => {
                warn!(invitation_id = %invitation.id, "Invitation redeemed concurrently");
                Err(AuthError::AlreadyUsed)
            }
            RedeemOutcome::Expired => Err(AuthError::InvitationExpired),
            RedeemOutcome::NotFound => Err(AuthError::InvitationNotFound),
        }
    }

    /// Resolves a raw token to its live invitation row.
    async fn lookup(&self, token: &str) -> Result<Invitation, AuthError> {
        let claims = self.jwt_decoder.verify_invitation(token).map_err(|e| {
            debug!(reason = %e, "Invitation token rejected");
            match e {
                TokenError::Expired => AuthError::InvitationExpired,
                _ => AuthError::InvitationNotFound,
            }
        })?;

        let invitation = self
            .invitations
            .find_invitation_by_fingerprint(&fingerprint(token))
            .await?
            .filter(|i| i.id == claims.sub)
            .ok_or(AuthError::InvitationNotFound)?;

        // Expired rows are dead regardless of `used`.
        if invitation.is_expired() {
            return Err(AuthError::InvitationExpired);
        }
        if invitation.used {
            return Err(AuthError::AlreadyUsed);
        }
        Ok(invitation)
    }
}
