//! # campus-database
//!
//! Persistence for Campus authentication: the store traits consumed by the
//! auth services, a PostgreSQL implementation backed by sqlx transactions,
//! and an in-memory implementation behind the `memory` feature.

pub mod connection;
#[cfg(feature = "memory")]
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod store;

pub use connection::DatabasePool;
#[cfg(feature = "memory")]
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{
    BootstrapOutcome, BootstrapStore, IdentityStore, InvitationStore, NewRegistration,
    RedeemOutcome, SessionStore, StoreError, StoreResult, UniqueField,
};
