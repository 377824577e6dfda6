//! Refresh session queries.

use async_trait::async_trait;
use sqlx::PgExecutor;
use uuid::Uuid;

use campus_entity::session::{CreateSession, Session};

use super::PgStore;
use crate::store::error::map_sqlx;
use crate::store::{SessionStore, StoreResult};

/// Insert a session row on any executor, so transactions can share it.
pub(super) async fn insert_session<'e, E: PgExecutor<'e>>(
    executor: E,
    data: &CreateSession,
) -> StoreResult<Session> {
    sqlx::query_as::<_, Session>(
        "INSERT INTO sessions (id, user_id, refresh_token_hash, expires_at) \
         VALUES ($1, $2, $3, $4) \
         RETURNING *",
    )
    .bind(data.id)
    .bind(data.user_id)
    .bind(&data.refresh_token_hash)
    .bind(data.expires_at)
    .fetch_one(executor)
    .await
    .map_err(map_sqlx("Failed to create session"))
}

#[async_trait]
impl SessionStore for PgStore {
    async fn create_session(&self, data: CreateSession) -> StoreResult<Session> {
        insert_session(&self.pool, &data).await
    }

    async fn find_session_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> StoreResult<Option<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE refresh_token_hash = $1 AND expires_at > NOW()",
        )
        .bind(fingerprint)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx("Failed to find session by refresh token"))
    }

    async fn rotate_session(
        &self,
        user_id: Uuid,
        old_fingerprint: &str,
        next: CreateSession,
    ) -> StoreResult<Option<Session>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(map_sqlx("Failed to begin session rotation"))?;

        // A concurrent rotation of the same token blocks on the row lock and
        // then deletes nothing.
        let removed: Option<Uuid> = sqlx::query_scalar(
            "DELETE FROM sessions \
             WHERE refresh_token_hash = $1 AND user_id = $2 AND expires_at > NOW() \
             RETURNING id",
        )
        .bind(old_fingerprint)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx("Failed to revoke rotated session"))?;

        if removed.is_none() {
            return Ok(None);
        }

        let session = insert_session(&mut *tx, &next).await?;

        tx.commit()
            .await
            .map_err(map_sqlx("Failed to commit session rotation"))?;

        Ok(Some(session))
    }

    async fn delete_session(&self, user_id: Uuid, session_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1 AND user_id = $2")
            .bind(session_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx("Failed to delete session"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_sessions_for_identity(&self, user_id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx("Failed to delete user sessions"))?;
        Ok(result.rows_affected())
    }
}
