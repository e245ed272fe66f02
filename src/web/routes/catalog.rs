use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    model::{
        CrudRepository, Page, ResourceTyped,
        entity::{Lesson, Module, Question},
    },
    web::{
        AppState, AuthenticatedUser, WebError, WebResult,
        dto::{
            lessons::{LessonDetail, LessonSummary},
            modules::ModuleSummary,
            questions::LearnerQuestion,
        },
        error::ErrorResponse,
        routes::PaginationQuery,
    },
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CatalogFilter {
    level: Option<String>,
    tag: Option<String>,
    q: Option<String>,
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/modules", get(modules_list_handler))
        .route("/modules/{id}", get(module_get_handler))
        .route("/modules/{id}/lessons", get(module_lessons_handler))
        .route("/lessons", get(lessons_list_handler))
        .route("/lessons/{id}", get(lesson_get_handler))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/modules",
    description = "Module catalog, newest first. Filters: level, q (title/description)",
    responses(
        (status = 200, description = "Requested page of modules", body = Page<ModuleSummary>),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "catalog"
)]
async fn modules_list_handler(
    State(state): State<AppState>,
    Query(filter): Query<CatalogFilter>,
    Query(page): Query<PaginationQuery>,
) -> WebResult<impl IntoResponse> {
    let actor = AuthenticatedUser::admin();
    let level = filter.level.as_deref().map(str::to_lowercase);

    let modules = Module::list_filtered(
        state.mm(),
        &actor,
        level.as_deref(),
        filter.q.as_deref(),
        page.limit(),
        page.offset(),
    )
    .await
    .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?;

    let total = Module::count_filtered(state.mm(), &actor, level.as_deref(), filter.q.as_deref())
        .await
        .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?;

    let mut items = Vec::with_capacity(modules.len());
    for module in modules {
        let lesson_count = Lesson::count_by_module(state.mm(), &actor, module.id())
            .await
            .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;
        items.push(ModuleSummary::new(module, lesson_count));
    }

    Ok((
        StatusCode::OK,
        Json(Page::new(items, total, page.limit(), page.offset())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/modules/{id}",
    description = "Single module with its lesson count",
    responses(
        (status = 200, description = "The module", body = ModuleSummary),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "catalog"
)]
async fn module_get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let actor = AuthenticatedUser::admin();
    let module = Module::find_by_id(state.mm(), &actor, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Module::get_resource_type()))?;

    let lesson_count = Lesson::count_by_module(state.mm(), &actor, module.id())
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(ModuleSummary::new(module, lesson_count))))
}

#[utoipa::path(
    get,
    path = "/api/v1/modules/{id}/lessons",
    description = "Lessons of one module ordered by their position, bodies excluded",
    responses(
        (status = 200, description = "Requested page of lessons", body = Page<LessonSummary>),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "catalog"
)]
async fn module_lessons_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(page): Query<PaginationQuery>,
) -> WebResult<impl IntoResponse> {
    let actor = AuthenticatedUser::admin();

    Module::find_by_id(state.mm(), &actor, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Module::get_resource_type()))?;

    let lessons = Lesson::all_by_module(state.mm(), &actor, id, page.limit(), page.offset())
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;
    let total = Lesson::count_by_module(state.mm(), &actor, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    let items: Vec<LessonSummary> = lessons.into_iter().map(LessonSummary::from).collect();

    Ok((
        StatusCode::OK,
        Json(Page::new(items, total, page.limit(), page.offset())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/lessons",
    description = "Lesson catalog, newest first. Filters: level, tag, q. Bodies excluded",
    responses(
        (status = 200, description = "Requested page of lessons", body = Page<LessonSummary>),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "catalog"
)]
async fn lessons_list_handler(
    State(state): State<AppState>,
    Query(filter): Query<CatalogFilter>,
    Query(page): Query<PaginationQuery>,
) -> WebResult<impl IntoResponse> {
    let actor = AuthenticatedUser::admin();
    let level = filter.level.as_deref().map(str::to_lowercase);

    let lessons = Lesson::list_filtered(
        state.mm(),
        &actor,
        level.as_deref(),
        filter.tag.as_deref(),
        filter.q.as_deref(),
        page.limit(),
        page.offset(),
    )
    .await
    .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    let total = Lesson::count_filtered(
        state.mm(),
        &actor,
        level.as_deref(),
        filter.tag.as_deref(),
        filter.q.as_deref(),
    )
    .await
    .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    let items: Vec<LessonSummary> = lessons.into_iter().map(LessonSummary::from).collect();

    Ok((
        StatusCode::OK,
        Json(Page::new(items, total, page.limit(), page.offset())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/lessons/{id}",
    description = "Full lesson body plus its questions with answer keys stripped",
    responses(
        (status = 200, description = "The lesson", body = LessonDetail),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "catalog"
)]
async fn lesson_get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let actor = AuthenticatedUser::admin();
    let lesson = Lesson::find_by_id(state.mm(), &actor, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Lesson::get_resource_type()))?;

    let questions = Question::find_all_by_lesson(state.mm(), &actor, lesson.id())
        .await
        .map_err(|e| WebError::resource_fetch_error(Question::get_resource_type(), e))?;

    let questions: Vec<LearnerQuestion> =
        questions.into_iter().map(LearnerQuestion::from).collect();

    Ok((StatusCode::OK, Json(LessonDetail::new(lesson, questions))))
}
