use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    model::{
        CrudRepository, ResourceTyped,
        entity::{Lesson, Module, ProgressEntity, Question},
    },
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::progress::{
            BookmarkBody, BookmarkReply, ProgressRow, ProgressSummary, SaveProgressBody,
            SaveProgressReply, StatsOverviewReply, UserProgressReply, VALID_STATUSES,
            coerce_percent,
        },
        error::ErrorResponse,
        middlewares,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/save-progress", post(save_progress_handler))
        .route("/user-progress", get(user_progress_handler))
        .route("/stats/overview", get(stats_overview_handler))
        .route("/lessons/{id}/bookmark", patch(bookmark_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/save-progress",
    request_body = SaveProgressBody,
    description = "Upserts per-lesson status and completion percent for the current user",
    responses(
        (status = 200, description = "Progress saved", body = SaveProgressReply),
        (status = 400, description = "Unknown status", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "progress",
    security(
        ("bearer" = [])
    )
)]
async fn save_progress_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<SaveProgressBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    if !VALID_STATUSES.contains(&payload.status.as_str()) {
        return Err(WebError::validation(
            "Invalid status. Must be one of: in_progress, completed",
        ));
    }

    let percent = coerce_percent(payload.percent.as_ref());

    let saved = ProgressEntity::upsert_status(
        state.mm(),
        user,
        payload.lesson_id,
        &payload.status,
        percent,
    )
    .await
    .map_err(|e| WebError::resource_fetch_error(ProgressEntity::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(SaveProgressReply {
            message: "Progress saved.".to_string(),
            progress_id: saved.id().to_owned(),
            status: payload.status,
            percent,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/user-progress",
    description = "All progress rows for the current user, most recently updated first",
    responses(
        (status = 200, description = "Progress rows with a summary", body = UserProgressReply),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "progress",
    security(
        ("bearer" = [])
    )
)]
async fn user_progress_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let rows = ProgressEntity::all_for_user(state.mm(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(ProgressEntity::get_resource_type(), e))?;

    let completed = rows.iter().filter(|p| p.status() == "completed").count() as i64;
    let in_progress = rows.iter().filter(|p| p.status() == "in_progress").count() as i64;
    let total = rows.len() as i64;

    let data: Vec<ProgressRow> = rows.into_iter().map(ProgressRow::from).collect();

    Ok((
        StatusCode::OK,
        Json(UserProgressReply {
            data,
            summary: ProgressSummary {
                completed,
                in_progress,
                total,
            },
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/stats/overview",
    description = "Dashboard counters: catalog totals plus the current user's progress",
    responses(
        (status = 200, description = "The counters", body = StatsOverviewReply),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "progress",
    security(
        ("bearer" = [])
    )
)]
async fn stats_overview_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let total_modules = Module::count(state.mm(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?;
    let total_lessons = Lesson::count(state.mm(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;
    let total_questions = Question::count(state.mm(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(Question::get_resource_type(), e))?;

    let user_completed = ProgressEntity::count_for_user_by_status(state.mm(), user, "completed")
        .await
        .map_err(|e| WebError::resource_fetch_error(ProgressEntity::get_resource_type(), e))?;
    let user_in_progress =
        ProgressEntity::count_for_user_by_status(state.mm(), user, "in_progress")
            .await
            .map_err(|e| WebError::resource_fetch_error(ProgressEntity::get_resource_type(), e))?;
    let user_bookmarks = ProgressEntity::count_bookmarked_for_user(state.mm(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(ProgressEntity::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(StatsOverviewReply {
            total_modules,
            total_lessons,
            total_questions,
            user_completed,
            user_in_progress,
            user_bookmarks,
            // streak tracking is not wired up yet
            streak_days: 0,
        }),
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/lessons/{id}/bookmark",
    request_body = BookmarkBody,
    description = "Sets or clears the bookmark flag on a lesson for the current user",
    responses(
        (status = 200, description = "Bookmark updated", body = BookmarkReply),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "progress",
    security(
        ("bearer" = [])
    )
)]
async fn bookmark_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BookmarkBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    Lesson::find_by_id(state.mm(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Lesson::get_resource_type()))?;

    ProgressEntity::upsert_bookmark(state.mm(), user, id, payload.bookmarked)
        .await
        .map_err(|e| WebError::resource_fetch_error(ProgressEntity::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(BookmarkReply {
            message: "Bookmark updated.".to_string(),
            lesson_id: id,
            bookmarked: payload.bookmarked,
        }),
    ))
}
