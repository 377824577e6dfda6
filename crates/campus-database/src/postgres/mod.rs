//! PostgreSQL store implementation.
//!
//! Each read-then-write operation runs in one transaction and relies on
//! unique indexes and conditional updates, never on in-process locks.

mod bootstrap;
mod identity;
mod invitation;
mod session;

use sqlx::PgPool;

/// Store backed by a PostgreSQL pool. Implements every store trait.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Return a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
