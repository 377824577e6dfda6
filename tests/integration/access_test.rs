//! Role and ownership checks at the HTTP boundary.

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_student_is_forbidden_on_admin_endpoint() {
    let app = TestApp::new();
    let (_, student) = app.with_student().await;

    let response = app
        .request(
            "POST",
            "/api/admin/invitations",
            Some(json!({ "email": "t@x.com", "role": "teacher" })),
            Some(&student.access_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_missing_or_bad_bearer_is_unauthorized() {
    let app = TestApp::new();
    app.bootstrap().await;

    for token in [None, Some("not-a-jwt")] {
        let response = app.request("GET", "/api/auth/me", None, token).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["success"], false);
    }

    let response = app
        .request(
            "POST",
            "/api/admin/invitations",
            Some(json!({ "email": "t@x.com", "role": "teacher" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_is_not_a_bearer() {
    let app = TestApp::new();
    let admin = app.bootstrap().await;

    let response = app
        .request("GET", "/api/auth/me", None, Some(&admin.refresh_token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invitation_token_is_not_a_bearer() {
    let app = TestApp::new();
    let admin = app.bootstrap().await;
    let invitation = app
        .invite(&admin.admin_token, "t@x.com", "teacher", None)
        .await;

    let response = app
        .request("GET", "/api/auth/me", None, Some(&invitation))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ownership_of_user_resources() {
    let app = TestApp::new();
    let (admin, student) = app.with_student().await;

    let own = app
        .request(
            "GET",
            &format!("/api/users/{}", student.user_id),
            None,
            Some(&student.access_token),
        )
        .await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.body["data"]["username"], "s1");

    let other = app
        .request(
            "GET",
            &format!("/api/users/{}", admin.admin_id),
            None,
            Some(&student.access_token),
        )
        .await;
    assert_eq!(other.status, StatusCode::FORBIDDEN);

    let by_admin = app
        .request(
            "GET",
            &format!("/api/users/{}", student.user_id),
            None,
            Some(&admin.access_token),
        )
        .await;
    assert_eq!(by_admin.status, StatusCode::OK);

    // Admins pass ownership for any id, including ones that do not exist.
    let missing = app
        .request(
            "GET",
            &format!("/api/users/{}", Uuid::new_v4()),
            None,
            Some(&admin.access_token),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let anonymous = app
        .request("GET", &format!("/api/users/{}", student.user_id), None, None)
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_user_id_is_a_validation_error() {
    let app = TestApp::new();
    let admin = app.bootstrap().await;

    let response = app
        .request("GET", "/api/users/not-a-uuid", None, Some(&admin.access_token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
