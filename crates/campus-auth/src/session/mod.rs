//! Session lifecycle: login, refresh rotation and logout.

pub mod manager;
pub mod prepare;

pub use manager::{LoginResult, SessionManager};
pub use prepare::{PreparedSession, prepare_session};
