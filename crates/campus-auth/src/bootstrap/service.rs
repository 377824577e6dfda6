//! Creates the first administrator exactly once.
//!
//! Uninitialized --init--> Initialized (terminal). Uniqueness is enforced
//! by the store's bootstrap marker, so concurrent calls yield exactly one
//! success and every other caller sees [`AuthError::AlreadyInitialized`].

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use campus_core::config::AuthConfig;
use campus_database::{BootstrapOutcome, BootstrapStore};
use campus_entity::session::{Session, TokenPair};
use campus_entity::user::{CreateUser, User, UserRole};

use crate::error::AuthError;
use crate::jwt::{IssuedToken, JwtEncoder, TokenType};
use crate::keys::{AdminCertificate, KeyService};
use crate::password::{PasswordHasher, PasswordValidator};
use crate::session::prepare_session;
use crate::validation::{normalize_email, validate_username};

/// Credentials for the first administrator.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    /// Desired username.
    pub username: String,
    /// Plaintext password, checked against the password policy.
    pub password: String,
    /// Optional email address.
    pub email: Option<String>,
}

/// Everything produced by a successful bootstrap.
#[derive(Debug, Clone)]
pub struct BootstrapResult {
    /// The administrator identity.
    pub user: User,
    /// Its initial session.
    pub session: Session,
    /// Long-lived administrator token.
    pub admin_token: IssuedToken,
    /// Access and refresh tokens for the initial session.
    pub tokens: TokenPair,
    /// Certificate binding the administrator to its public key.
    pub certificate: AdminCertificate,
    /// Where the keypair was written. `None` if writing it failed.
    pub key_directory: Option<PathBuf>,
}

/// Runs the one-time bootstrap.
#[derive(Clone)]
pub struct BootstrapService {
    store: Arc<dyn BootstrapStore>,
    jwt_encoder: Arc<JwtEncoder>,
    password_hasher: PasswordHasher,
    password_validator: PasswordValidator,
    keys: KeyService,
    admin_token_ttl: chrono::Duration,
}

impl std::fmt::Debug for BootstrapService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapService")
            .field("keys", &self.keys)
            .finish()
    }
}

impl BootstrapService {
    /// Creates the service.
    pub fn new(
        store: Arc<dyn BootstrapStore>,
        jwt_encoder: Arc<JwtEncoder>,
        password_hasher: PasswordHasher,
        password_validator: PasswordValidator,
        keys: KeyService,
        auth_config: &AuthConfig,
    ) -> Self {
        Self {
            store,
            jwt_encoder,
            password_hasher,
            password_validator,
            keys,
            admin_token_ttl: auth_config.admin_token_ttl(),
        }
    }

    /// Whether bootstrap has already run.
    pub async fn is_initialized(&self) -> Result<bool, AuthError> {
        Ok(self.store.is_initialized().await?)
    }

    /// Creates the administrator, its keypair, certificate and first session.
    pub async fn init(&self, credentials: AdminCredentials) -> Result<BootstrapResult, AuthError> {
        if self.store.is_initialized().await? {
            warn!("Bootstrap rejected: already initialized");
            return Err(AuthError::AlreadyInitialized);
        }

        let username = validate_username(&credentials.username)?;
        let email = credentials
            .email
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .map(normalize_email)
            .transpose()?;
        let mut context = vec![username.as_str()];
        if let Some(email) = email.as_deref() {
            context.push(email);
        }
        self.password_validator
            .validate_with_context(&credentials.password, &context)?;

        let password_hash = self
            .password_hasher
            .hash_password_async(&credentials.password)
            .await?;

        let keys = self.keys.clone();
        let pair = tokio::task::spawn_blocking(move || keys.generate_key_pair())
            .await
            .map_err(|e| AuthError::Internal(format!("Key generation task failed: {e}")))??;

        let admin_id = Uuid::now_v7();
        let certificate = AdminCertificate::issue(&pair, admin_id, &username, Utc::now())?;

        let prepared = prepare_session(&self.jwt_encoder, admin_id, UserRole::Admin)?;
        let admin_token = self.jwt_encoder.issue(
            admin_id,
            UserRole::Admin,
            TokenType::Admin,
            self.admin_token_ttl,
            Some(prepared.session_id()),
        )?;

        let admin = CreateUser {
            id: admin_id,
            username,
            email,
            password_hash,
            role: UserRole::Admin,
            teacher_ref: None,
        };

        let (user, session) = match self
            .store
            .create_bootstrap_admin(admin, prepared.record)
            .await?
        {
            BootstrapOutcome::Created { user, session } => (user, session),
            BootstrapOutcome::AlreadyInitialized => {
                warn!("Bootstrap lost a concurrent race: already initialized");
                return Err(AuthError::AlreadyInitialized);
            }
        };

        // Keys are written only once this call is known to have won.
        let keys = self.keys.clone();
        let persisted_certificate = certificate.clone();
        let key_directory =
            match tokio::task::spawn_blocking(move || keys.persist(&pair, &persisted_certificate))
                .await
            {
                Ok(Ok(path)) => Some(path),
                Ok(Err(e)) => {
                    error!(admin_id = %user.id, error = %e, "Failed to persist administrator keys");
                    None
                }
                Err(e) => {
                    error!(admin_id = %user.id, error = %e, "Key persistence task failed");
                    None
                }
            };

        info!(
            admin_id = %user.id,
            session_id = %session.id,
            "Bootstrap completed: administrator created"
        );

        Ok(BootstrapResult {
            user,
            session,
            admin_token,
            tokens: prepared.tokens,
            certificate,
            key_directory,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::config::{KeyConfig, PasswordPolicyConfig};
    use campus_database::MemoryStore;

    use crate::jwt::JwtDecoder;

    fn service(store: &MemoryStore, dir: &std::path::Path, secret: &str) -> BootstrapService {
        let config = AuthConfig::new(secret);
        BootstrapService::new(
            Arc::new(store.clone()),
            Arc::new(JwtEncoder::new(&config)),
            PasswordHasher::new(),
            PasswordValidator::new(&PasswordPolicyConfig::default()),
            KeyService::new(&KeyConfig {
                directory: dir.to_path_buf(),
                rsa_bits: 1024,
            }),
            &config,
        )
    }

    fn credentials(username: &str) -> AdminCredentials {
        AdminCredentials {
            username: username.to_string(),
            password: "Abc12345!".to_string(),
            email: None,
        }
    }

    #[tokio::test]
    async fn test_init_creates_admin_and_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let secret = "bootstrap-init-secret-0123456789abcdef";
        let store = MemoryStore::new();
        let bootstrap = service(&store, &dir.path().join("keys"), secret);

        let result = bootstrap.init(credentials("admin")).await.unwrap();
        assert_eq!(result.user.role, UserRole::Admin);
        assert!(result.certificate.verify().is_ok());
        assert!(result.key_directory.is_some());

        let decoder = JwtDecoder::new(&AuthConfig::new(secret));
        let claims = decoder
            .verify(&result.admin_token.token, &[TokenType::Admin])
            .unwrap();
        assert_eq!(claims.sub, result.user.id);
        assert!(decoder.verify_access(&result.tokens.access_token.token).is_ok());
    }

    #[tokio::test]
    async fn test_second_init_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();
        let bootstrap = service(&store, dir.path(), "bootstrap-twice-secret-0123456789abcd");

        bootstrap.init(credentials("admin")).await.unwrap();
        let err = bootstrap.init(credentials("admin2")).await.unwrap_err();
        assert!(matches!(err, AuthError::AlreadyInitialized));
        assert_eq!(store.count_users_with_role(UserRole::Admin).await, 1);
    }

    #[tokio::test]
    async fn test_weak_password_is_rejected_before_anything_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();
        let bootstrap = service(&store, dir.path(), "bootstrap-weak-secret-0123456789abcde");

        let err = bootstrap
            .init(AdminCredentials {
                username: "admin".to_string(),
                password: "short".to_string(),
                email: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::WeakSecret { .. }));
        assert!(!bootstrap.is_initialized().await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_init_creates_one_admin() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();
        let a = service(&store, &dir.path().join("a"), "bootstrap-race-secret-0123456789abcde");
        let b = service(&store, &dir.path().join("b"), "bootstrap-race-secret-0123456789abcde");

        let (first, second) = tokio::join!(a.init(credentials("admin")), b.init(credentials("root")));
        let successes = [first.is_ok(), second.is_ok()]
            .iter()
            .filter(|ok| **ok)
            .count();
        assert_eq!(successes, 1);
        assert_eq!(store.count_users_with_role(UserRole::Admin).await, 1);
    }
}
