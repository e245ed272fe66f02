use axum::{
    Json, Router, extract::State, http::StatusCode, middleware, response::IntoResponse,
    routing::post,
};

use crate::{
    model::{
        CrudRepository, ResourceTyped,
        entity::{ReportCreate, ReportEntity, UserEntity},
    },
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::feedback::{REPORT_MESSAGE_MAX_CHARS, ReportBody, ReportReply, VALID_REPORT_TYPES},
        error::ErrorResponse,
        middlewares,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/report", post(report_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/report",
    request_body = ReportBody,
    description = "Files a bug/content/feature report from the current user",
    responses(
        (status = 201, description = "Report stored", body = ReportReply),
        (status = 400, description = "Unknown type or oversized message", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "feedback",
    security(
        ("bearer" = [])
    )
)]
async fn report_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<ReportBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    if !VALID_REPORT_TYPES.contains(&payload.report_type.as_str()) {
        return Err(WebError::validation(
            "Invalid type. Must be one of: bug, content, feature",
        ));
    }

    if payload.message.chars().count() > REPORT_MESSAGE_MAX_CHARS {
        return Err(WebError::validation(
            "Message must be under 5000 characters.",
        ));
    }

    let email = UserEntity::find_by_id(state.mm(), user, user.user_id())
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .map(|u| u.email().to_owned())
        .unwrap_or_default();

    let report = ReportEntity::create(
        state.mm(),
        user,
        ReportCreate {
            user_id: user.user_id(),
            email,
            report_type: payload.report_type,
            message: payload.message,
            context: payload.context.unwrap_or_else(|| serde_json::json!({})),
        },
    )
    .await
    .map_err(|e| WebError::resource_fetch_error(ReportEntity::get_resource_type(), e))?;

    Ok((
        StatusCode::CREATED,
        Json(ReportReply {
            message: "Report submitted. Thank you!".to_string(),
            report_id: report.id(),
        }),
    ))
}
