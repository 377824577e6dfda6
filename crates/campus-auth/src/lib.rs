//! # campus-auth
//!
//! Authentication and authorization for the Campus training-management API.
//!
//! ## Modules
//!
//! - `password`: Argon2id password hashing and strength policy
//! - `jwt`: bearer token issuance and verification
//! - `keys`: administrator RSA keypair and certificate (bootstrap only)
//! - `session`: login, refresh rotation and logout
//! - `bootstrap`: one-time administrator creation
//! - `invitation`: invitation issuance and single-use redemption
//! - `access`: per-request authentication, role and ownership checks

pub mod access;
pub mod bootstrap;
pub mod error;
pub mod fingerprint;
pub mod invitation;
pub mod jwt;
pub mod keys;
pub mod password;
pub mod session;
pub mod validation;

pub use access::{AccessControl, Principal, require_ownership, require_role};
pub use bootstrap::{AdminCredentials, BootstrapResult, BootstrapService};
pub use error::{AuthError, TokenError};
pub use fingerprint::fingerprint;
pub use invitation::{InvitationService, InvitationSummary, IssuedInvitation, RegistrationResult};
pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder, TokenType, TokenVerifier};
pub use keys::{AdminCertificate, AdminKeyPair, KeyService};
pub use password::{PasswordHasher, PasswordValidator};
pub use session::{LoginResult, PreparedSession, SessionManager};
