mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

#[tokio::test]
async fn flow_report_validation_and_submission() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(
            Action::new("report_anonymous", "POST", "/api/v1/report")
                .with_body(json!({ "type": "bug", "message": "It broke." }))
                .with_expect(StatusCode::UNAUTHORIZED),
        )
        .step(signup_action("reporter", "pass123").with_save_as("reporter"))
        .step(
            Action::new("report_bad_type", "POST", "/api/v1/report")
                .with_auth("reporter")
                .with_body(json!({ "type": "praise", "message": "Nice app!" }))
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| {
                    assert!(body.contains("Invalid type. Must be one of: bug, content, feature"))
                }),
        )
        .step(
            Action::new("report_oversized", "POST", "/api/v1/report")
                .with_auth("reporter")
                .with_body(json!({ "type": "bug", "message": "x".repeat(5001) }))
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| {
                    assert!(body.contains("Message must be under 5000 characters."))
                }),
        )
        .step(
            Action::new("report_ok", "POST", "/api/v1/report")
                .with_auth("reporter")
                .with_body(json!({
                    "type": "content",
                    "message": "The zero-shot lesson has a typo.",
                    "context": { "page": "/lessons/abc" },
                }))
                .with_expect(StatusCode::CREATED)
                .assert_body(|body| assert!(body.contains("Report submitted. Thank you!")))
                .assert_body(|body| assert!(body.contains("reportId"))),
        )
        .run(&mut server, db)
        .await;
}
