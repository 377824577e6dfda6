//! Invitation domain entities.

pub mod model;

pub use model::{CreateInvitation, Invitation};
