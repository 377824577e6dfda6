//! Invitation issuance, lookup and redemption.

use axum::http::StatusCode;
use serde_json::json;

use campus_entity::user::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_invitation_link_carries_token() {
    let app = TestApp::new();
    let admin = app.bootstrap().await;

    let response = app
        .request(
            "POST",
            "/api/admin/invitations",
            Some(json!({ "email": "T@X.com", "role": "teacher" })),
            Some(&admin.admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let data = &response.body["data"];
    let token = data["token"].as_str().unwrap();
    assert_eq!(data["email"], "t@x.com");
    assert!(data["link"].as_str().unwrap().ends_with(token));
    assert!(data.get("token_hash").is_none());
}

#[tokio::test]
async fn test_invitation_role_rules() {
    let app = TestApp::new();
    let admin = app.bootstrap().await;

    let cases = [
        json!({ "email": "a@x.com", "role": "admin" }),
        json!({ "email": "b@x.com", "role": "student" }),
        json!({ "email": "c@x.com", "role": "student", "teacher_ref": "  " }),
        json!({ "email": "d@x.com", "role": "teacher", "teacher_ref": "t1" }),
        json!({ "email": "not-an-email", "role": "teacher" }),
        json!({ "email": "e@x.com", "role": "principal" }),
    ];

    for body in cases {
        let response = app
            .request(
                "POST",
                "/api/admin/invitations",
                Some(body.clone()),
                Some(&admin.admin_token),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{body}");
    }
}

#[tokio::test]
async fn test_invitation_for_registered_email_conflicts() {
    let app = TestApp::new();
    let (admin, _) = app.with_student().await;

    let response = app
        .request(
            "POST",
            "/api/admin/invitations",
            Some(json!({ "email": "S@x.com", "role": "student", "teacher_ref": "t2" })),
            Some(&admin.admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_unknown_and_expired_invitations_look_alike() {
    let app = TestApp::new();
    let admin = app.bootstrap().await;
    let invitation = app
        .invite(&admin.admin_token, "t@x.com", "teacher", None)
        .await;

    let forged = app
        .request("GET", "/api/invitations/forged.token.value", None, None)
        .await;
    assert_eq!(forged.status, StatusCode::NOT_FOUND);

    let fetched = app
        .request("GET", &format!("/api/invitations/{invitation}"), None, None)
        .await;
    let id = fetched.body["data"]["id"].as_str().unwrap().parse().unwrap();
    app.store.expire_invitation(id).await;

    let expired = app
        .request("GET", &format!("/api/invitations/{invitation}"), None, None)
        .await;
    assert_eq!(expired.status, StatusCode::NOT_FOUND);
    assert_eq!(expired.body, forged.body);

    let complete = app
        .request(
            "POST",
            &format!("/api/invitations/{invitation}/complete"),
            Some(json!({ "username": "teach", "password": "Xyz98765!" })),
            None,
        )
        .await;
    assert_eq!(complete.status, StatusCode::NOT_FOUND);
    assert_eq!(app.store.count_users_with_role(UserRole::Teacher).await, 0);
}

#[tokio::test]
async fn test_complete_on_expired_student_invitation_is_not_found() {
    let app = TestApp::new();
    let admin = app.bootstrap().await;
    let invitation = app
        .invite(&admin.admin_token, "s@x.com", "student", Some("t1"))
        .await;

    let fetched = app
        .request("GET", &format!("/api/invitations/{invitation}"), None, None)
        .await;
    let id = fetched.body["data"]["id"].as_str().unwrap().parse().unwrap();
    app.store.expire_invitation(id).await;

    let body = json!({ "username": "s1", "password": "Xyz98765!" });
    let expired = app
        .request(
            "POST",
            &format!("/api/invitations/{invitation}/complete"),
            Some(body.clone()),
            None,
        )
        .await;
    assert_eq!(expired.status, StatusCode::NOT_FOUND);

    let forged = app
        .request(
            "POST",
            "/api/invitations/forged.token.value/complete",
            Some(body),
            None,
        )
        .await;
    assert_eq!(expired.body, forged.body);
    assert_eq!(app.store.count_users_with_role(UserRole::Student).await, 0);

    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "s1", "password": "Xyz98765!" })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_complete_with_taken_username_leaves_invitation_usable() {
    let app = TestApp::new();
    let admin = app.bootstrap().await;
    let invitation = app
        .invite(&admin.admin_token, "t@x.com", "teacher", None)
        .await;

    let taken = app
        .request(
            "POST",
            &format!("/api/invitations/{invitation}/complete"),
            Some(json!({ "username": "ADMIN", "password": "Xyz98765!" })),
            None,
        )
        .await;
    assert_eq!(taken.status, StatusCode::CONFLICT);

    let weak = app
        .request(
            "POST",
            &format!("/api/invitations/{invitation}/complete"),
            Some(json!({ "username": "teach", "password": "weakpass" })),
            None,
        )
        .await;
    assert_eq!(weak.status, StatusCode::BAD_REQUEST);

    let teacher = app.complete(&invitation, "teach", "Xyz98765!").await;
    let me = app
        .request("GET", "/api/auth/me", None, Some(&teacher.access_token))
        .await;
    assert_eq!(me.body["data"]["role"], "teacher");
    assert!(me.body["data"]["teacher_ref"].is_null());
}
