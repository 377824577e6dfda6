//! Per-request authentication, role and ownership checks.
//!
//! Stateless: every decision is a function of the bearer token and the
//! route's requirements.

pub mod control;
pub mod principal;

pub use control::{AccessControl, require_ownership, require_role};
pub use principal::Principal;
