//! Invitation queries and redemption.

use async_trait::async_trait;

use campus_entity::invitation::{CreateInvitation, Invitation};
use campus_entity::session::CreateSession;
use campus_entity::user::CreateUser;

use super::PgStore;
use super::identity::insert_user;
use super::session::insert_session;
use crate::store::error::map_sqlx;
use crate::store::{InvitationStore, NewRegistration, RedeemOutcome, StoreResult};

#[async_trait]
impl InvitationStore for PgStore {
    async fn create_invitation(&self, data: CreateInvitation) -> StoreResult<Invitation> {
        sqlx::query_as::<_, Invitation>(
            "INSERT INTO invitations (id, token_hash, email, role, teacher_ref, invited_by, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(data.id)
        .bind(&data.token_hash)
        .bind(&data.email)
        .bind(data.role)
        .bind(&data.teacher_ref)
        .bind(data.invited_by)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx("Failed to create invitation"))
    }

    async fn find_invitation_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> StoreResult<Option<Invitation>> {
        sqlx::query_as::<_, Invitation>("SELECT * FROM invitations WHERE token_hash = $1")
            .bind(fingerprint)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx("Failed to find invitation"))
    }

    async fn redeem_invitation(
        &self,
        fingerprint: &str,
        registration: NewRegistration,
        session: CreateSession,
    ) -> StoreResult<RedeemOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(map_sqlx("Failed to begin redemption"))?;

        // The conditional update is the single point where `used` flips.
        // A concurrent redeemer waits on the row lock, then matches nothing.
        let claimed = sqlx::query_as::<_, Invitation>(
            "UPDATE invitations SET used = TRUE, used_at = NOW() \
             WHERE token_hash = $1 AND used = FALSE AND expires_at > NOW() \
             RETURNING *",
        )
        .bind(fingerprint)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx("Failed to claim invitation"))?;

        let Some(claimed) = claimed else {
            let existing = sqlx::query_as::<_, Invitation>(
                "SELECT * FROM invitations WHERE token_hash = $1",
            )
            .bind(fingerprint)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx("Failed to find invitation"))?;

            return Ok(match existing {
                None => RedeemOutcome::NotFound,
                Some(invitation) if invitation.used => RedeemOutcome::AlreadyUsed,
                Some(_) => RedeemOutcome::Expired,
            });
        };

        let user = insert_user(
            &mut *tx,
            &CreateUser {
                id: registration.user_id,
                username: registration.username,
                email: Some(claimed.email.clone()),
                password_hash: registration.password_hash,
                role: claimed.role,
                teacher_ref: claimed.teacher_ref.clone(),
            },
        )
        .await?;

        let invitation = sqlx::query_as::<_, Invitation>(
            "UPDATE invitations SET used_by = $2 WHERE id = $1 RETURNING *",
        )
        .bind(claimed.id)
        .bind(user.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx("Failed to record invitation redeemer"))?;

        let session = insert_session(&mut *tx, &session).await?;

        tx.commit()
            .await
            .map_err(map_sqlx("Failed to commit redemption"))?;

        Ok(RedeemOutcome::Redeemed {
            user,
            session,
            invitation,
        })
    }
}
