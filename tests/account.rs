mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

#[tokio::test]
async fn flow_signup_signin_me() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(
            signup_action("bob", "hunter2")
                .with_save_as("bob")
                .assert_body(|body| assert!(body.contains("token")))
                .assert_body(|body| assert!(body.contains("\"bob\""))),
        )
        .step(
            signup_action("bob", "hunter2")
                .with_expect(StatusCode::CONFLICT)
                .assert_body(|body| assert!(body.contains("already"))),
        )
        .step(signin_action("bob", "wrong-password").with_expect(StatusCode::UNAUTHORIZED))
        .step(signin_action("bob", "hunter2").with_save_as("bob_again"))
        .step(
            Action::new("me", "GET", "/api/v1/auth/me")
                .with_auth("bob")
                .assert_body(|body| assert!(body.contains("\"username\":\"bob\"")))
                .assert_body(|body| assert!(body.contains("\"percentComplete\":0"))),
        )
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn flow_signup_rejects_missing_fields() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(
            Action::new("signup_empty", "POST", "/api/v1/auth/signup")
                .with_body(json!({ "username": "", "email": "", "password": "" }))
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| {
                    assert!(body.contains("Missing required fields: username, password"))
                }),
        )
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn flow_me_requires_a_token() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(Action::new("me_anonymous", "GET", "/api/v1/auth/me").with_expect(StatusCode::UNAUTHORIZED))
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn flow_garbage_token_is_rejected() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(
            Action::new("me_bad_token", "GET", "/api/v1/auth/me")
                .with_bearer("not-a-jwt")
                .with_expect(StatusCode::UNAUTHORIZED),
        )
        .run(&mut server, db)
        .await;
}
