//! Administrator RSA keypair and certificate.
//!
//! Used only by bootstrap. The private key never leaves this module except
//! through [`KeyService::persist`], which writes it to the restricted key
//! directory.

pub mod certificate;
pub mod service;

pub use certificate::AdminCertificate;
pub use service::{AdminKeyPair, KeyService};
