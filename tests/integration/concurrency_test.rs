//! Racing requests against the single-use invariants.

use axum::http::StatusCode;
use serde_json::json;

use campus_entity::user::UserRole;

use crate::helpers::{ADMIN_PASSWORD, TestApp, send};

#[tokio::test]
async fn test_concurrent_bootstrap_creates_one_admin() {
    let app = TestApp::new();

    let (a, b) = tokio::join!(
        send(
            app.router.clone(),
            "POST",
            "/api/bootstrap/init",
            Some(json!({ "username": "admin", "password": ADMIN_PASSWORD })),
            None,
        ),
        send(
            app.router.clone(),
            "POST",
            "/api/bootstrap/init",
            Some(json!({ "username": "root", "password": ADMIN_PASSWORD })),
            None,
        ),
    );

    let mut statuses = [a.status, b.status];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);
    assert_eq!(app.store.count_users_with_role(UserRole::Admin).await, 1);
}

#[tokio::test]
async fn test_concurrent_completion_redeems_once() {
    let app = TestApp::new();
    let admin = app.bootstrap().await;
    let invitation = app
        .invite(&admin.admin_token, "s@x.com", "student", Some("t1"))
        .await;
    let path = format!("/api/invitations/{invitation}/complete");

    let (a, b) = tokio::join!(
        send(
            app.router.clone(),
            "POST",
            &path,
            Some(json!({ "username": "s1", "password": "Xyz98765!" })),
            None,
        ),
        send(
            app.router.clone(),
            "POST",
            &path,
            Some(json!({ "username": "s2", "password": "Xyz98765!" })),
            None,
        ),
    );

    let mut statuses = [a.status, b.status];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);
    assert_eq!(app.store.count_users_with_role(UserRole::Student).await, 1);
}

#[tokio::test]
async fn test_concurrent_refresh_rotates_once() {
    let app = TestApp::new();
    let (_, student) = app.with_student().await;
    let body = json!({ "refresh_token": student.refresh_token });

    let (a, b) = tokio::join!(
        send(app.router.clone(), "POST", "/api/auth/refresh", Some(body.clone()), None),
        send(app.router.clone(), "POST", "/api/auth/refresh", Some(body), None),
    );

    let mut statuses = [a.status, b.status];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::UNAUTHORIZED]);
    assert_eq!(app.store.count_sessions(student.user_id).await, 1);
}
