//! Bootstrap marker and administrator creation.

use async_trait::async_trait;

use campus_entity::session::CreateSession;
use campus_entity::user::CreateUser;

use super::PgStore;
use super::identity::insert_user;
use super::session::insert_session;
use crate::store::error::map_sqlx;
use crate::store::{BootstrapOutcome, BootstrapStore, StoreResult};

#[async_trait]
impl BootstrapStore for PgStore {
    async fn is_initialized(&self) -> StoreResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM bootstrap_state)")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx("Failed to read bootstrap state"))
    }

    async fn create_bootstrap_admin(
        &self,
        admin: CreateUser,
        session: CreateSession,
    ) -> StoreResult<BootstrapOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(map_sqlx("Failed to begin bootstrap"))?;

        // The marker goes first: a concurrent bootstrap blocks on its primary
        // key until this transaction ends, then inserts nothing.
        let marked = sqlx::query(
            "INSERT INTO bootstrap_state (singleton, admin_id) VALUES (TRUE, $1) \
             ON CONFLICT (singleton) DO NOTHING",
        )
        .bind(admin.id)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx("Failed to write bootstrap marker"))?
        .rows_affected();

        if marked == 0 {
            return Ok(BootstrapOutcome::AlreadyInitialized);
        }

        let user = insert_user(&mut *tx, &admin).await?;
        let session = insert_session(&mut *tx, &session).await?;

        tx.commit()
            .await
            .map_err(map_sqlx("Failed to commit bootstrap"))?;

        Ok(BootstrapOutcome::Created { user, session })
    }
}
