//! Refresh rotation and logout.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_refresh_rotates_the_pair() {
    let app = TestApp::new();
    let (_, student) = app.with_student().await;

    let first = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": student.refresh_token })),
            None,
        )
        .await;
    assert_eq!(first.status, StatusCode::OK, "{}", first.body);
    let rotated = first.body["data"]["refresh_token"].as_str().unwrap().to_string();
    assert_ne!(rotated, student.refresh_token);

    let reused = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": student.refresh_token })),
            None,
        )
        .await;
    assert_eq!(reused.status, StatusCode::UNAUTHORIZED);

    let second = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": rotated })),
            None,
        )
        .await;
    assert_eq!(second.status, StatusCode::OK);

    let access = second.body["data"]["access_token"].as_str().unwrap();
    let me = app.request("GET", "/api/auth/me", None, Some(access)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(app.store.count_sessions(student.user_id).await, 1);
}

#[tokio::test]
async fn test_refresh_rejects_access_token_in_body() {
    let app = TestApp::new();
    let admin = app.bootstrap().await;

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": admin.access_token })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_with_foreign_bearer_is_rejected() {
    let app = TestApp::new();
    let (admin, student) = app.with_student().await;

    let mismatched = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": student.refresh_token })),
            Some(&admin.access_token),
        )
        .await;
    assert_eq!(mismatched.status, StatusCode::UNAUTHORIZED);

    let matched = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": student.refresh_token })),
            Some(&student.access_token),
        )
        .await;
    assert_eq!(matched.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_revokes_refresh_only() {
    let app = TestApp::new();
    let (_, student) = app.with_student().await;

    let logout = app
        .request("POST", "/api/auth/logout", None, Some(&student.access_token))
        .await;
    assert_eq!(logout.status, StatusCode::OK);

    let refresh = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": student.refresh_token })),
            None,
        )
        .await;
    assert_eq!(refresh.status, StatusCode::UNAUTHORIZED);

    // Access tokens are verified statelessly and live until they expire.
    let me = app
        .request("GET", "/api/auth/me", None, Some(&student.access_token))
        .await;
    assert_eq!(me.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_all_and_session_revocation() {
    let app = TestApp::new();
    let (admin, student) = app.with_student().await;
    app.login("s1", "Xyz98765!").await;
    app.login("s1", "Xyz98765!").await;
    assert_eq!(app.store.count_sessions(student.user_id).await, 3);

    let forbidden = app
        .request(
            "DELETE",
            &format!("/api/users/{}/sessions", admin.admin_id),
            None,
            Some(&student.access_token),
        )
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let revoked = app
        .request(
            "DELETE",
            &format!("/api/users/{}/sessions", student.user_id),
            None,
            Some(&admin.access_token),
        )
        .await;
    assert_eq!(revoked.status, StatusCode::OK);
    assert_eq!(revoked.body["data"]["count"], 3);
    assert_eq!(app.store.count_sessions(student.user_id).await, 0);

    let again = app.login("s1", "Xyz98765!").await;
    let all = app
        .request("POST", "/api/auth/logout-all", None, Some(&again.access_token))
        .await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.body["data"]["count"], 1);
}
