//! Invitation issuance and single-use redemption.

pub mod service;

pub use service::{InvitationService, InvitationSummary, IssuedInvitation, RegistrationResult};
