mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

fn seed_lesson_steps(flow: Flow) -> Flow {
    flow.step(signin_admin_action())
        .step(
            Action::new("create_module", "POST", "/api/v1/admin/modules")
                .with_auth("admin")
                .with_body(json!({
                    "title": "Prompt Basics",
                    "description": "First steps",
                    "level": "beginner",
                }))
                .with_expect(StatusCode::CREATED)
                .with_save_as("module"),
        )
        .step(
            Action::new("create_lesson", "POST", "/api/v1/admin/lessons")
                .with_auth("admin")
                .with_dyn_body(|ctx| {
                    json!({
                        "moduleId": ctx.get("module")["id"],
                        "title": "Zero-shot prompting",
                        "content": "Just ask.",
                        "published": true,
                    })
                })
                .with_expect(StatusCode::CREATED)
                .with_save_as("lesson"),
        )
}

#[tokio::test]
async fn flow_save_progress_clamps_and_upserts() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    let flow = seed_lesson_steps(Flow::new())
        .step(signup_action("learner", "pass123").with_save_as("learner"))
        .step(
            Action::new("save_overshoot", "POST", "/api/v1/save-progress")
                .with_auth("learner")
                .with_dyn_body(|ctx| {
                    json!({
                        "lessonId": ctx.get("lesson")["id"],
                        "status": "in_progress",
                        "percent": 150,
                    })
                })
                .assert_body(|body| assert!(body.contains("Progress saved.")))
                .assert_body(|body| assert!(body.contains("\"percent\":100"))),
        )
        .step(
            Action::new("save_non_numeric_percent", "POST", "/api/v1/save-progress")
                .with_auth("learner")
                .with_dyn_body(|ctx| {
                    json!({
                        "lessonId": ctx.get("lesson")["id"],
                        "status": "completed",
                        "percent": "almost done",
                    })
                })
                .assert_body(|body| assert!(body.contains("\"status\":\"completed\"")))
                .assert_body(|body| assert!(body.contains("\"percent\":0"))),
        )
        .step(
            Action::new("save_bad_status", "POST", "/api/v1/save-progress")
                .with_auth("learner")
                .with_dyn_body(|ctx| {
                    json!({
                        "lessonId": ctx.get("lesson")["id"],
                        "status": "done",
                        "percent": 10,
                    })
                })
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| {
                    assert!(body.contains("Invalid status. Must be one of: in_progress, completed"))
                }),
        )
        .step(
            // the two saves above hit the same lesson, so one row
            Action::new("user_progress", "GET", "/api/v1/user-progress")
                .with_auth("learner")
                .assert_body(|body| assert!(body.contains("\"completed\":1")))
                .assert_body(|body| assert!(body.contains("\"inProgress\":0")))
                .assert_body(|body| assert!(body.contains("\"total\":1"))),
        )
        .step(
            Action::new("save_anonymous", "POST", "/api/v1/save-progress")
                .with_dyn_body(|ctx| {
                    json!({
                        "lessonId": ctx.get("lesson")["id"],
                        "status": "completed",
                    })
                })
                .with_expect(StatusCode::UNAUTHORIZED),
        );

    flow.run(&mut server, db).await;
}

#[tokio::test]
async fn flow_bookmark_and_stats_overview() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    let flow = seed_lesson_steps(Flow::new())
        .step(signup_action("learner", "pass123").with_save_as("learner"))
        .step(
            Action::new("bookmark_unknown_lesson", "PATCH", "/api/v1/lessons/00000000-0000-0000-0000-000000000000/bookmark")
                .with_auth("learner")
                .with_body(json!({ "bookmarked": true }))
                .with_expect(StatusCode::NOT_FOUND),
        )
        .step(
            Action::new("bookmark_lesson", "PATCH", "/api/v1/lessons/{id}/bookmark")
                .with_auth("learner")
                .with_dyn_path(|ctx| {
                    format!(
                        "/api/v1/lessons/{}/bookmark",
                        ctx.get("lesson")["id"].as_str().unwrap()
                    )
                })
                .with_body(json!({ "bookmarked": true }))
                .assert_body(|body| assert!(body.contains("Bookmark updated.")))
                .assert_body(|body| assert!(body.contains("\"bookmarked\":true"))),
        )
        .step(
            // status write must not clobber the bookmark flag
            Action::new("save_after_bookmark", "POST", "/api/v1/save-progress")
                .with_auth("learner")
                .with_dyn_body(|ctx| {
                    json!({
                        "lessonId": ctx.get("lesson")["id"],
                        "status": "completed",
                        "percent": 100,
                    })
                }),
        )
        .step(
            Action::new("merge_preserved", "GET", "/api/v1/user-progress")
                .with_auth("learner")
                .assert_body(|body| assert!(body.contains("\"bookmarked\":true")))
                .assert_body(|body| assert!(body.contains("\"status\":\"completed\""))),
        )
        .step(
            Action::new("stats_overview", "GET", "/api/v1/stats/overview")
                .with_auth("learner")
                .assert_body(|body| assert!(body.contains("\"totalModules\":1")))
                .assert_body(|body| assert!(body.contains("\"totalLessons\":1")))
                .assert_body(|body| assert!(body.contains("\"userBookmarks\":1")))
                .assert_body(|body| assert!(body.contains("\"streakDays\":0"))),
        );

    flow.run(&mut server, db).await;
}
