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
                        "content": "# Zero-shot\nJust ask.",
                        "published": true,
                    })
                })
                .with_expect(StatusCode::CREATED)
                .with_save_as("lesson"),
        )
}

#[tokio::test]
async fn flow_submit_response_grades_and_reveals_explanation() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    let flow = seed_lesson_steps(Flow::new())
        .step(
            Action::new("create_mcq", "POST", "/api/v1/admin/lessons")
                .with_auth("admin")
                .with_dyn_path(|ctx| {
                    format!(
                        "/api/v1/admin/lessons/{}/questions",
                        ctx.get("lesson")["id"].as_str().unwrap()
                    )
                })
                .with_body(json!({
                    "type": "mcq",
                    "prompt": "Which prompt is zero-shot?",
                    "choices": [
                        { "id": "a", "text": "No examples given" },
                        { "id": "b", "text": "Five examples given" }
                    ],
                    "answerKey": ["a"],
                    "explanation": "Zero-shot means no examples.",
                }))
                .with_expect(StatusCode::CREATED)
                .with_save_as("question"),
        )
        .step(signup_action("learner", "pass123").with_save_as("learner"))
        .step(
            Action::new("submit_correct", "POST", "/api/v1/submit-response")
                .with_auth("learner")
                .with_dyn_body(|ctx| {
                    json!({
                        "lessonId": ctx.get("lesson")["id"],
                        "questionId": ctx.get("question")["id"],
                        "answer": "a",
                        "timeMs": 4200,
                    })
                })
                .assert_body(|body| assert!(body.contains("\"result\":\"correct\"")))
                .assert_body(|body| assert!(body.contains("Zero-shot means no examples."))),
        )
        .step(
            Action::new("submit_incorrect", "POST", "/api/v1/submit-response")
                .with_auth("learner")
                .with_dyn_body(|ctx| {
                    json!({
                        "lessonId": ctx.get("lesson")["id"],
                        "questionId": ctx.get("question")["id"],
                        "answer": "b",
                    })
                })
                .assert_body(|body| assert!(body.contains("\"result\":\"incorrect\"")))
                .assert_body(|body| assert!(body.contains("\"score\":0.0"))),
        )
        .step(
            Action::new("submit_anonymous", "POST", "/api/v1/submit-response")
                .with_dyn_body(|ctx| {
                    json!({
                        "lessonId": ctx.get("lesson")["id"],
                        "questionId": ctx.get("question")["id"],
                        "answer": "a",
                    })
                })
                .with_expect(StatusCode::UNAUTHORIZED),
        )
        .step(
            Action::new("submit_unknown_question", "POST", "/api/v1/submit-response")
                .with_auth("learner")
                .with_dyn_body(|ctx| {
                    json!({
                        "lessonId": ctx.get("lesson")["id"],
                        "questionId": "00000000-0000-0000-0000-000000000000",
                        "answer": "a",
                    })
                })
                .with_expect(StatusCode::NOT_FOUND),
        );

    flow.run(&mut server, db).await;
}

#[tokio::test]
async fn flow_short_answers_get_partial_credit() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    let flow = seed_lesson_steps(Flow::new())
        .step(
            Action::new("create_short", "POST", "/api/v1/admin/lessons")
                .with_auth("admin")
                .with_dyn_path(|ctx| {
                    format!(
                        "/api/v1/admin/lessons/{}/questions",
                        ctx.get("lesson")["id"].as_str().unwrap()
                    )
                })
                .with_body(json!({
                    "type": "short",
                    "prompt": "Name the technique of reasoning step by step.",
                    "answerKey": ["chain of thought"],
                    "explanation": "Step-by-step reasoning is chain of thought.",
                }))
                .with_expect(StatusCode::CREATED)
                .with_save_as("question"),
        )
        .step(signup_action("learner", "pass123").with_save_as("learner"))
        .step(
            Action::new("submit_partial", "POST", "/api/v1/submit-response")
                .with_auth("learner")
                .with_dyn_body(|ctx| {
                    json!({
                        "lessonId": ctx.get("lesson")["id"],
                        "questionId": ctx.get("question")["id"],
                        "answer": "use chain of thought on hard problems",
                    })
                })
                .assert_body(|body| assert!(body.contains("\"result\":\"partial\"")))
                .assert_body(|body| assert!(body.contains("\"score\":0.5"))),
        );

    flow.run(&mut server, db).await;
}

#[tokio::test]
async fn flow_llm_feedback_modes() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    let flow = seed_lesson_steps(Flow::new())
        .step(
            Action::new("create_question", "POST", "/api/v1/admin/lessons")
                .with_auth("admin")
                .with_dyn_path(|ctx| {
                    format!(
                        "/api/v1/admin/lessons/{}/questions",
                        ctx.get("lesson")["id"].as_str().unwrap()
                    )
                })
                .with_body(json!({
                    "type": "short",
                    "prompt": "Explain few-shot prompting.",
                    "answerKey": ["examples in the prompt"],
                }))
                .with_expect(StatusCode::CREATED)
                .with_save_as("question"),
        )
        .step(signup_action("learner", "pass123").with_save_as("learner"))
        .step(
            Action::new("feedback_hint", "POST", "/api/v1/llm-feedback")
                .with_auth("learner")
                .with_dyn_body(|ctx| {
                    json!({
                        "lessonId": ctx.get("lesson")["id"],
                        "questionId": ctx.get("question")["id"],
                        "answer": "you give it examples",
                        "mode": "hint",
                    })
                })
                .assert_body(|body| assert!(body.contains("feedback")))
                .assert_body(|body| assert!(body.contains("Explain few-shot prompting."))),
        )
        .step(
            Action::new("feedback_bad_mode", "POST", "/api/v1/llm-feedback")
                .with_auth("learner")
                .with_dyn_body(|ctx| {
                    json!({
                        "lessonId": ctx.get("lesson")["id"],
                        "questionId": ctx.get("question")["id"],
                        "answer": "you give it examples",
                        "mode": "HINT",
                    })
                })
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| {
                    assert!(body.contains("Invalid mode. Must be one of: hint, rubric, improve"))
                }),
        );

    flow.run(&mut server, db).await;
}
