//! Bootstrap endpoint.

use axum::http::StatusCode;
use serde_json::json;

use campus_auth::keys::service::{CERTIFICATE_FILE, PRIVATE_KEY_FILE, PUBLIC_KEY_FILE};
use campus_auth::AdminCertificate;
use campus_entity::user::UserRole;

use crate::helpers::{ADMIN_PASSWORD, TestApp};

#[tokio::test]
async fn test_bootstrap_once() {
    let app = TestApp::new();
    app.bootstrap().await;

    let second = app
        .request(
            "POST",
            "/api/bootstrap/init",
            Some(json!({ "username": "admin2", "password": ADMIN_PASSWORD })),
            None,
        )
        .await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.body["error"], "CONFLICT");
    assert_eq!(app.store.count_users_with_role(UserRole::Admin).await, 1);
}

#[tokio::test]
async fn test_bootstrap_returns_verifiable_certificate_and_writes_keys() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/bootstrap/init",
            Some(json!({ "username": "admin", "password": ADMIN_PASSWORD })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let data = &response.body["data"];
    assert_eq!(data["user"]["role"], "admin");

    let certificate: AdminCertificate =
        serde_json::from_value(data["certificate"].clone()).unwrap();
    assert_eq!(certificate.username, "admin");
    certificate.verify().unwrap();

    let dir = app.keys.path().join("admin");
    assert!(dir.join(PRIVATE_KEY_FILE).exists());
    assert!(dir.join(PUBLIC_KEY_FILE).exists());
    assert!(dir.join(CERTIFICATE_FILE).exists());
    assert!(
        !response
            .body
            .to_string()
            .contains("PRIVATE KEY"),
        "private key must not be returned"
    );
}

#[tokio::test]
async fn test_bootstrap_rejects_weak_password() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/bootstrap/init",
            Some(json!({ "username": "admin", "password": "short" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert_eq!(app.store.count_users_with_role(UserRole::Admin).await, 0);
}

#[tokio::test]
async fn test_admin_token_is_accepted_on_admin_routes() {
    let app = TestApp::new();
    let admin = app.bootstrap().await;

    let with_admin_token = app
        .request("GET", "/api/auth/me", None, Some(&admin.admin_token))
        .await;
    assert_eq!(with_admin_token.status, StatusCode::OK);
    assert_eq!(with_admin_token.body["data"]["id"], admin.admin_id.to_string());
}

#[tokio::test]
async fn test_malformed_body_is_a_validation_error() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/bootstrap/init",
            Some(json!({ "username": "admin" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
}

#[tokio::test]
async fn test_bootstrap_and_login_share_token_shape() {
    let app = TestApp::new();
    let bootstrap = app
        .request(
            "POST",
            "/api/bootstrap/init",
            Some(json!({ "username": "admin", "password": ADMIN_PASSWORD })),
            None,
        )
        .await;
    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "admin", "password": ADMIN_PASSWORD })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);

    for data in [&bootstrap.body["data"], &login.body["data"]] {
        for field in [
            "session_id",
            "access_token",
            "access_expires_at",
            "refresh_token",
            "refresh_expires_at",
        ] {
            assert!(data[field].is_string(), "missing {field} in {data}");
        }
        assert!(data.get("tokens").is_none());
    }
}
