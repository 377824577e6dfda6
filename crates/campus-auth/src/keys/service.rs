//! RSA key generation, RSASSA-PSS signing and key persistence.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rand::rngs::OsRng;
use rsa::pkcs8::{DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::pss::{BlindedSigningKey, Signature, VerifyingKey};
use rsa::signature::{RandomizedSigner, SignatureEncoding, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use tracing::info;

use campus_core::config::KeyConfig;

use super::certificate::AdminCertificate;
use crate::error::AuthError;

/// File name of the PKCS#8 private key.
pub const PRIVATE_KEY_FILE: &str = "admin_private_key.pem";
/// File name of the SPKI public key.
pub const PUBLIC_KEY_FILE: &str = "admin_public_key.pem";
/// File name of the signed certificate.
pub const CERTIFICATE_FILE: &str = "admin_certificate.json";

/// A generated administrator keypair.
#[derive(Clone)]
pub struct AdminKeyPair {
    private_key: RsaPrivateKey,
    public_key: RsaPublicKey,
}

impl std::fmt::Debug for AdminKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminKeyPair")
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl AdminKeyPair {
    /// Signs `data` with RSASSA-PSS over SHA-256 and a random salt.
    ///
    /// Two signatures of the same data differ.
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>, AuthError> {
        let signing_key = BlindedSigningKey::<Sha256>::new(self.private_key.clone());
        let signature = signing_key
            .try_sign_with_rng(&mut OsRng, data)
            .map_err(|e| AuthError::Key(format!("Signing failed: {e}")))?;
        Ok(signature.to_vec())
    }

    /// The public key in SPKI PEM form.
    pub fn public_key_pem(&self) -> Result<String, AuthError> {
        self.public_key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| AuthError::Key(format!("Failed to encode public key: {e}")))
    }

    fn private_key_pem(&self) -> Result<String, AuthError> {
        self.private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map(|pem| pem.to_string())
            .map_err(|e| AuthError::Key(format!("Failed to encode private key: {e}")))
    }
}

/// Generates, verifies and stores administrator keys.
#[derive(Debug, Clone)]
pub struct KeyService {
    directory: PathBuf,
    bits: usize,
}

impl KeyService {
    /// Creates a key service from configuration.
    pub fn new(config: &KeyConfig) -> Self {
        Self {
            directory: config.directory.clone(),
            bits: config.rsa_bits,
        }
    }

    /// Directory the keys are written to.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Generates a fresh RSA keypair. CPU-heavy: call from a blocking thread.
    pub fn generate_key_pair(&self) -> Result<AdminKeyPair, AuthError> {
        let private_key = RsaPrivateKey::new(&mut OsRng, self.bits)
            .map_err(|e| AuthError::Key(format!("Key generation failed: {e}")))?;
        let public_key = RsaPublicKey::from(&private_key);
        Ok(AdminKeyPair {
            private_key,
            public_key,
        })
    }

    /// Checks a PSS signature against a PEM public key.
    pub fn verify(data: &[u8], signature: &[u8], public_key_pem: &str) -> Result<(), AuthError> {
        let public_key = RsaPublicKey::from_public_key_pem(public_key_pem)
            .map_err(|e| AuthError::Key(format!("Invalid public key: {e}")))?;
        let signature = Signature::try_from(signature)
            .map_err(|e| AuthError::Key(format!("Invalid signature encoding: {e}")))?;
        VerifyingKey::<Sha256>::new(public_key)
            .verify(data, &signature)
            .map_err(|_| AuthError::Key("Signature does not verify".to_string()))
    }

    /// Writes the keypair and certificate into the key directory.
    ///
    /// The directory is created with mode 0700 and the private key file with
    /// mode 0600 on unix. An existing private key is never overwritten.
    pub fn persist(
        &self,
        pair: &AdminKeyPair,
        certificate: &AdminCertificate,
    ) -> Result<PathBuf, AuthError> {
        let io_err = |what: &str, e: std::io::Error| AuthError::Key(format!("{what}: {e}"));

        fs::create_dir_all(&self.directory)
            .map_err(|e| io_err("Failed to create key directory", e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.directory, fs::Permissions::from_mode(0o700))
                .map_err(|e| io_err("Failed to restrict key directory", e))?;
        }

        let private_pem = pair.private_key_pem()?;
        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(self.directory.join(PRIVATE_KEY_FILE))
            .map_err(|e| io_err("Failed to create private key file", e))?;
        file.write_all(private_pem.as_bytes())
            .map_err(|e| io_err("Failed to write private key", e))?;

        fs::write(
            self.directory.join(PUBLIC_KEY_FILE),
            pair.public_key_pem()?.as_bytes(),
        )
        .map_err(|e| io_err("Failed to write public key", e))?;

        let certificate_json = serde_json::to_vec_pretty(certificate)
            .map_err(|e| AuthError::Key(format!("Failed to encode certificate: {e}")))?;
        fs::write(self.directory.join(CERTIFICATE_FILE), certificate_json)
            .map_err(|e| io_err("Failed to write certificate", e))?;

        info!(
            directory = %self.directory.display(),
            admin_id = %certificate.admin_id,
            "Administrator keys persisted"
        );
        Ok(self.directory.clone())
    }
}
