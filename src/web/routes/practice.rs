use axum::{
    Json, Router, extract::State, http::StatusCode, middleware, response::IntoResponse,
    routing::post,
};

use crate::{
    core::evaluator::{QuestionKind, evaluate},
    model::{
        CrudRepository, ResourceTyped,
        entity::{Lesson, Question, ResponseCreate, ResponseEntity},
    },
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::practice::{
            FeedbackMode, LlmFeedbackBody, LlmFeedbackReply, SubmitResponseBody,
            SubmitResponseReply,
        },
        error::ErrorResponse,
        middlewares,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/submit-response", post(submit_response_handler))
        .route("/llm-feedback", post(llm_feedback_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/submit-response",
    request_body = SubmitResponseBody,
    description = "Grades an answer, records the attempt and reveals the explanation",
    responses(
        (status = 200, description = "Graded attempt", body = SubmitResponseReply),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 404, description = "Lesson or question not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "practice",
    security(
        ("bearer" = [])
    )
)]
async fn submit_response_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<SubmitResponseBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    Lesson::find_by_id(state.mm(), user, payload.lesson_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Lesson::get_resource_type()))?;

    let question = Question::find_by_id(state.mm(), user, payload.question_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Question::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Question::get_resource_type()))?;

    let evaluation = evaluate(
        QuestionKind::from(question.question_type()),
        &payload.answer,
        question.answer_key(),
        question.explanation(),
    );

    let saved = ResponseEntity::create(
        state.mm(),
        user,
        ResponseCreate {
            user_id: user.user_id(),
            lesson_id: payload.lesson_id,
            question_id: payload.question_id,
            answer: payload.answer,
            result: evaluation.verdict.as_str().to_string(),
            score: evaluation.score,
            time_ms: payload.time_ms,
        },
    )
    .await
    .map_err(|e| WebError::resource_fetch_error(ResponseEntity::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(SubmitResponseReply {
            result: evaluation.verdict,
            score: evaluation.score,
            explanation: evaluation.explanation,
            response_id: saved.id(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/llm-feedback",
    request_body = LlmFeedbackBody,
    description = "Canned coaching feedback for an answer. Modes: hint, rubric, improve",
    responses(
        (status = 200, description = "Feedback for the answer", body = LlmFeedbackReply),
        (status = 400, description = "Unknown mode", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 404, description = "Question not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "practice",
    security(
        ("bearer" = [])
    )
)]
async fn llm_feedback_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<LlmFeedbackBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let mode = FeedbackMode::parse(&payload.mode)
        .ok_or_else(|| WebError::validation("Invalid mode. Must be one of: hint, rubric, improve"))?;

    let question = Question::find_by_id(state.mm(), user, payload.question_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Question::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Question::get_resource_type()))?;

    let reply = mode.render(question.prompt(), &payload.answer);

    Ok((StatusCode::OK, Json(reply)))
}
