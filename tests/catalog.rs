mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::{Value, json};

/// Three modules across levels, each imported through the console.
fn seed_catalog_steps(flow: Flow) -> Flow {
    flow.step(signin_admin_action()).step(
        Action::new("import_modules", "POST", "/api/v1/admin/bulk-import")
            .with_auth("admin")
            .with_body(json!({
                "collection": "modules",
                "data": [
                    { "title": "Prompt Basics", "description": "First steps", "level": "beginner", "tags": ["intro"] },
                    { "title": "Structured Output", "description": "Beyond plain text", "level": "intermediate" },
                    { "title": "Agentic Prompts", "description": "Tools and loops", "level": "advanced" }
                ],
            }))
            .with_expect(StatusCode::CREATED),
    )
}

#[tokio::test]
async fn flow_module_catalog_filters_and_pages() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    let flow = seed_catalog_steps(Flow::new())
        .step(
            Action::new("list_all", "GET", "/api/v1/modules")
                .assert_body(|body| assert!(body.contains("\"total\":3")))
                .assert_body(|body| assert!(body.contains("\"lessonCount\":0"))),
        )
        .step(
            Action::new("filter_level", "GET", "/api/v1/modules")
                .with_param("level", "beginner")
                .assert_body(|body| assert!(body.contains("\"total\":1")))
                .assert_body(|body| assert!(body.contains("Prompt Basics"))),
        )
        .step(
            Action::new("text_filter", "GET", "/api/v1/modules")
                .with_param("q", "plain text")
                .assert_body(|body| assert!(body.contains("Structured Output")))
                .assert_body(|body| assert!(!body.contains("Agentic Prompts"))),
        )
        .step(
            Action::new("small_page", "GET", "/api/v1/modules")
                .with_param("limit", "2")
                .assert_body(|body| {
                    let v: Value = serde_json::from_str(body).unwrap();
                    assert_eq!(v["items"].as_array().unwrap().len(), 2);
                    assert_eq!(v["total"], json!(3));
                    assert_eq!(v["limit"], json!(2));
                }),
        )
        .step(
            Action::new("second_page", "GET", "/api/v1/modules")
                .with_param("limit", "2")
                .with_param("offset", "2")
                .assert_body(|body| {
                    let v: Value = serde_json::from_str(body).unwrap();
                    assert_eq!(v["items"].as_array().unwrap().len(), 1);
                }),
        )
        .step(
            Action::new("unknown_module", "GET", "/api/v1/modules/00000000-0000-0000-0000-000000000000")
                .with_expect(StatusCode::NOT_FOUND)
                .assert_body(|body| assert!(body.contains("not found"))),
        );

    flow.run(&mut server, db).await;
}

#[tokio::test]
async fn flow_lesson_detail_strips_answer_keys() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    let flow = seed_catalog_steps(Flow::new())
        .step(
            Action::new("list_for_id", "GET", "/api/v1/modules")
                .with_param("level", "beginner")
                .with_save_as("modules"),
        )
        .step(
            Action::new("create_lesson", "POST", "/api/v1/admin/lessons")
                .with_auth("admin")
                .with_dyn_body(|ctx| {
                    json!({
                        "moduleId": ctx.get("modules")["items"][0]["id"],
                        "title": "Zero-shot prompting",
                        "content": "# Zero-shot\nJust ask.",
                        "published": true,
                    })
                })
                .with_expect(StatusCode::CREATED)
                .with_save_as("lesson"),
        )
        .step(
            Action::new("create_question", "POST", "/api/v1/admin/lessons/{id}/questions")
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
                        { "id": "a", "text": "No examples" },
                        { "id": "b", "text": "Five examples" }
                    ],
                    "answerKey": ["a"],
                    "explanation": "Zero-shot means no examples.",
                }))
                .with_expect(StatusCode::CREATED),
        )
        .step(
            // list view: no lesson bodies
            Action::new("lessons_list", "GET", "/api/v1/lessons")
                .assert_body(|body| assert!(body.contains("Zero-shot prompting")))
                .assert_body(|body| assert!(!body.contains("Just ask."))),
        )
        .step(
            // detail view: body present, grading material absent
            Action::new("lesson_detail", "GET", "/api/v1/lessons/{id}")
                .with_dyn_path(|ctx| {
                    format!(
                        "/api/v1/lessons/{}",
                        ctx.get("lesson")["id"].as_str().unwrap()
                    )
                })
                .assert_body(|body| assert!(body.contains("Just ask.")))
                .assert_body(|body| assert!(body.contains("Which prompt is zero-shot?")))
                .assert_body(|body| assert!(!body.contains("answerKey")))
                .assert_body(|body| assert!(!body.contains("Zero-shot means no examples."))),
        );

    flow.run(&mut server, db).await;
}

#[tokio::test]
async fn flow_search_requires_query_and_paginates() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    let flow = seed_catalog_steps(Flow::new())
        .step(
            Action::new("missing_q", "GET", "/api/v1/search")
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| assert!(body.contains("Query parameter 'q' is required."))),
        )
        .step(
            Action::new("search_prompt", "GET", "/api/v1/search")
                .with_param("q", "prompt")
                .assert_body(|body| assert!(body.contains("Prompt Basics")))
                .assert_body(|body| assert!(body.contains("Agentic Prompts")))
                .assert_body(|body| assert!(body.contains("\"type\":\"module\""))),
        )
        .step(
            Action::new("search_first_page", "GET", "/api/v1/search")
                .with_param("q", "prompt")
                .with_param("limit", "1")
                .assert_body(|body| assert!(body.contains("\"hasMore\":true")))
                .with_save_as("page_one"),
        )
        .step(
            Action::new("search_after_cursor", "GET", "/api/v1/search")
                .with_dyn_path(|ctx| {
                    format!(
                        "/api/v1/search?q=prompt&limit=1&cursor={}",
                        ctx.get("page_one")["pagination"]["nextCursor"]
                            .as_str()
                            .unwrap()
                    )
                })
                .assert_body(|body| {
                    let v: Value = serde_json::from_str(body).unwrap();
                    assert_eq!(v["data"].as_array().unwrap().len(), 1);
                }),
        )
        .step(
            Action::new("search_lessons_only", "GET", "/api/v1/search")
                .with_param("q", "prompt")
                .with_param("type", "lesson")
                .assert_body(|body| assert!(!body.contains("\"type\":\"module\""))),
        );

    flow.run(&mut server, db).await;
}
