//! Signed statement binding the administrator identity to its public key.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::service::{AdminKeyPair, KeyService};
use crate::error::AuthError;

/// Administrator certificate, self-signed with the administrator keypair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCertificate {
    /// The administrator's user ID.
    pub admin_id: Uuid,
    /// The administrator's username.
    pub username: String,
    /// SPKI PEM public key.
    pub public_key_pem: String,
    /// When the certificate was issued.
    pub issued_at: DateTime<Utc>,
    /// Base64 PSS signature over [`AdminCertificate::payload`].
    pub signature: String,
}

impl AdminCertificate {
    /// Signs a new certificate for the given administrator.
    pub fn issue(
        pair: &AdminKeyPair,
        admin_id: Uuid,
        username: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<Self, AuthError> {
        let public_key_pem = pair.public_key_pem()?;
        let payload = canonical_payload(admin_id, username, issued_at, &public_key_pem);
        let signature = STANDARD.encode(pair.sign(payload.as_bytes())?);

        Ok(Self {
            admin_id,
            username: username.to_string(),
            public_key_pem,
            issued_at,
            signature,
        })
    }

    /// The exact bytes that were signed.
    pub fn payload(&self) -> String {
        canonical_payload(
            self.admin_id,
            &self.username,
            self.issued_at,
            &self.public_key_pem,
        )
    }

    /// Checks the signature with the embedded public key.
    pub fn verify(&self) -> Result<(), AuthError> {
        let signature = STANDARD
            .decode(&self.signature)
            .map_err(|e| AuthError::Key(format!("Invalid certificate signature encoding: {e}")))?;
        KeyService::verify(self.payload().as_bytes(), &signature, &self.public_key_pem)
    }
}

fn canonical_payload(
    admin_id: Uuid,
    username: &str,
    issued_at: DateTime<Utc>,
    public_key_pem: &str,
) -> String {
    format!(
        "{admin_id}|{username}|{}|{public_key_pem}",
        issued_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}
