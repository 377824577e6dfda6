//! One-time administrator bootstrap.

pub mod service;

pub use service::{AdminCredentials, BootstrapResult, BootstrapService};
