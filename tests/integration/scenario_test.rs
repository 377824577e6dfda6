//! The full bootstrap, invite, register and login journey.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{ADMIN_PASSWORD, TestApp};

#[tokio::test]
async fn test_end_to_end_student_onboarding() {
    let app = TestApp::new();

    let admin = app.bootstrap().await;
    let invitation = app
        .invite(&admin.admin_token, "s@x.com", "student", Some("t1"))
        .await;

    let fetched = app
        .request("GET", &format!("/api/invitations/{invitation}"), None, None)
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["data"]["email"], "s@x.com");
    assert_eq!(fetched.body["data"]["role"], "student");
    assert_eq!(fetched.body["data"]["teacher_ref"], "t1");
    assert_eq!(fetched.body["data"]["used"], false);

    let student = app.complete(&invitation, "s1", "Xyz98765!").await;

    let refetched = app
        .request("GET", &format!("/api/invitations/{invitation}"), None, None)
        .await;
    assert_eq!(refetched.status, StatusCode::CONFLICT);

    let login = app.login("s1", "Xyz98765!").await;
    assert_eq!(login.user_id, student.user_id);

    let wrong = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "s1", "password": "wrong" })),
            None,
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body["success"], false);

    let me = app
        .request("GET", "/api/auth/me", None, Some(&login.access_token))
        .await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["username"], "s1");
    assert_eq!(me.body["data"]["email"], "s@x.com");
    assert_eq!(me.body["data"]["teacher_ref"], "t1");
    assert!(me.body["data"].get("password_hash").is_none());

    // The administrator signs in with the bootstrap password as well.
    app.login("admin", ADMIN_PASSWORD).await;
}

#[tokio::test]
async fn test_login_does_not_reveal_unknown_user() {
    let app = TestApp::new();
    app.bootstrap().await;

    let unknown = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "nobody", "password": "Whatever1!" })),
            None,
        )
        .await;
    let wrong = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "admin", "password": "Whatever1!" })),
            None,
        )
        .await;

    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.body, wrong.body);
}

#[tokio::test]
async fn test_health_reports_ok() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["database"], "not_configured");
}
