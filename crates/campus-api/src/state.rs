//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use campus_auth::{
    AccessControl, BootstrapService, InvitationService, JwtDecoder, JwtEncoder, KeyService,
    PasswordHasher, PasswordValidator, SessionManager,
};
use campus_core::config::AppConfig;
use campus_database::{
    BootstrapStore, DatabasePool, IdentityStore, InvitationStore, SessionStore,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Process start, for the health endpoint
    pub started_at: Instant,

    // ── Persistence ──────────────────────────────────────────
    /// PostgreSQL pool, when running against a database
    pub database: Option<DatabasePool>,
    /// Identity lookup for the user endpoints
    pub identities: Arc<dyn IdentityStore>,

    // ── Auth ─────────────────────────────────────────────────
    /// Bearer token verification
    pub access: AccessControl,
    /// Login, refresh and logout
    pub session_manager: Arc<SessionManager>,
    /// One-time administrator creation
    pub bootstrap_service: Arc<BootstrapService>,
    /// Invitation issuance and redemption
    pub invitation_service: Arc<InvitationService>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("session_manager", &self.session_manager)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wires every service over one store implementing all persistence traits.
    pub fn new<S>(config: AppConfig, store: Arc<S>) -> Self
    where
        S: IdentityStore + SessionStore + InvitationStore + BootstrapStore + 'static,
    {
        let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let password_hasher = PasswordHasher::new();
        let password_validator = PasswordValidator::new(&config.password);

        let identities: Arc<dyn IdentityStore> = store.clone();
        let sessions: Arc<dyn SessionStore> = store.clone();
        let invitations: Arc<dyn InvitationStore> = store.clone();
        let bootstrap: Arc<dyn BootstrapStore> = store;

        let session_manager = SessionManager::new(
            Arc::clone(&jwt_encoder),
            Arc::clone(&jwt_decoder),
            Arc::clone(&identities),
            sessions,
            password_hasher.clone(),
        );

        let bootstrap_service = BootstrapService::new(
            bootstrap,
            Arc::clone(&jwt_encoder),
            password_hasher.clone(),
            password_validator.clone(),
            KeyService::new(&config.keys),
            &config.auth,
        );

        let invitation_service = InvitationService::new(
            invitations,
            Arc::clone(&identities),
            jwt_encoder,
            Arc::clone(&jwt_decoder),
            password_hasher,
            password_validator,
            config.invitation.clone(),
        );

        Self {
            config: Arc::new(config),
            started_at: Instant::now(),
            database: None,
            identities,
            access: AccessControl::new(jwt_decoder),
            session_manager: Arc::new(session_manager),
            bootstrap_service: Arc::new(bootstrap_service),
            invitation_service: Arc::new(invitation_service),
        }
    }

    /// Attaches the database pool reported by the health endpoint.
    pub fn with_database(mut self, database: DatabasePool) -> Self {
        self.database = Some(database);
        self
    }
}
