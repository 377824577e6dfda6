//! Route handlers organized by domain.

pub mod auth;
pub mod bootstrap;
pub mod health;
pub mod invitation;
pub mod user;
