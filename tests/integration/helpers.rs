//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use campus_api::AppState;
use campus_core::config::{
    AppConfig, AuthConfig, DatabaseConfig, InvitationConfig, KeyConfig, LoggingConfig,
    PasswordPolicyConfig, ServerConfig,
};
use campus_database::MemoryStore;

/// Password satisfying the default policy.
pub const ADMIN_PASSWORD: &str = "Abc12345!";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Store backing the router, for direct inspection
    pub store: Arc<MemoryStore>,
    /// Key directory, removed on drop
    pub keys: TempDir,
}

/// Parsed response
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// Tokens returned by bootstrap
pub struct Bootstrapped {
    /// Administrator id
    pub admin_id: Uuid,
    /// Long-lived admin token
    pub admin_token: String,
    /// Access token of the first session
    pub access_token: String,
    /// Refresh token of the first session
    pub refresh_token: String,
}

/// Tokens returned by invitation completion or login
pub struct SignedIn {
    /// User id
    pub user_id: Uuid,
    /// Access token
    pub access_token: String,
    /// Refresh token
    pub refresh_token: String,
}

impl TestApp {
    /// Create a new test application with a fresh store and signing secret.
    pub fn new() -> Self {
        let keys = tempfile::tempdir().expect("Failed to create key directory");

        let config = AppConfig {
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: "postgres://unused".to_string(),
                max_connections: 1,
                min_connections: 0,
                connect_timeout_seconds: 1,
                idle_timeout_seconds: 1,
            },
            auth: AuthConfig::new(format!("integration-secret-{}", Uuid::new_v4())),
            password: PasswordPolicyConfig::default(),
            invitation: InvitationConfig::default(),
            keys: KeyConfig {
                directory: keys.path().join("admin"),
                rsa_bits: 1024,
            },
            logging: LoggingConfig::default(),
        };

        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(config, Arc::clone(&store));

        Self {
            router: campus_api::build_app(state),
            store,
            keys,
        }
    }

    /// Send a JSON request through the router.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        send(self.router.clone(), method, path, body, token).await
    }

    /// Bootstrap the administrator `admin` and return its tokens.
    pub async fn bootstrap(&self) -> Bootstrapped {
        let response = self
            .request(
                "POST",
                "/api/bootstrap/init",
                Some(json!({ "username": "admin", "password": ADMIN_PASSWORD })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        let data = &response.body["data"];
        Bootstrapped {
            admin_id: parse_id(&data["user"]["id"]),
            admin_token: string(&data["admin_token"]),
            access_token: string(&data["access_token"]),
            refresh_token: string(&data["refresh_token"]),
        }
    }

    /// Create an invitation and return its raw token.
    pub async fn invite(
        &self,
        admin_token: &str,
        email: &str,
        role: &str,
        teacher_ref: Option<&str>,
    ) -> String {
        let response = self
            .request(
                "POST",
                "/api/admin/invitations",
                Some(json!({ "email": email, "role": role, "teacher_ref": teacher_ref })),
                Some(admin_token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        string(&response.body["data"]["token"])
    }

    /// Complete an invitation and return the new identity's tokens.
    pub async fn complete(&self, invitation: &str, username: &str, password: &str) -> SignedIn {
        let response = self
            .request(
                "POST",
                &format!("/api/invitations/{invitation}/complete"),
                Some(json!({ "username": username, "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        signed_in(&response.body["data"])
    }

    /// Log in and return the session's tokens.
    pub async fn login(&self, username: &str, password: &str) -> SignedIn {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(json!({ "username": username, "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        signed_in(&response.body["data"])
    }

    /// Bootstrap, invite a student of teacher `t1` and complete it as `s1`.
    pub async fn with_student(&self) -> (Bootstrapped, SignedIn) {
        let admin = self.bootstrap().await;
        let invitation = self
            .invite(&admin.admin_token, "s@x.com", "student", Some("t1"))
            .await;
        let student = self.complete(&invitation, "s1", "Xyz98765!").await;
        (admin, student)
    }
}

/// Send a request through a router clone. Usable from concurrent futures.
pub async fn send(
    router: Router,
    method: &str,
    path: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> TestResponse {
    let body_str = body
        .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
        .unwrap_or_default();

    let mut req = Request::builder()
        .method(method)
        .uri(path)
        .header("Content-Type", "application/json");

    if let Some(token) = token {
        req = req.header("Authorization", format!("Bearer {token}"));
    }

    let req = req
        .body(Body::from(body_str))
        .expect("Failed to build request");

    let response = router.oneshot(req).await.expect("Failed to send request");

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("Failed to read body");

    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    TestResponse { status, body }
}

fn signed_in(data: &Value) -> SignedIn {
    SignedIn {
        user_id: parse_id(&data["user"]["id"]),
        access_token: string(&data["access_token"]),
        refresh_token: string(&data["refresh_token"]),
    }
}

fn string(value: &Value) -> String {
    value
        .as_str()
        .unwrap_or_else(|| panic!("expected a string, got {value}"))
        .to_string()
}

fn parse_id(value: &Value) -> Uuid {
    Uuid::parse_str(&string(value)).expect("Invalid UUID in response")
}
