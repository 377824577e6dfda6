//! # campus-api
//!
//! HTTP API layer for Campus authentication built on Axum.
//!
//! Provides the bootstrap, session, invitation and user endpoints, the
//! bearer-token middleware, extractors, DTOs and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
