use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    core::{
        engagement::summarize_lesson,
        evaluator::QuestionKind,
        roadmap::Level,
    },
    model::{
        CrudRepository, ResourceTyped,
        entity::{
            Lesson, Module, ProgressEntity, Question, QuestionCreate, ResponseEntity,
            answer_key_references_choices,
        },
    },
    web::{
        AppState, WebError, WebResult,
        dto::admin::{
            BulkImportBody, BulkImportReply, CheckReply, CreatedReply, EngagementQuery,
            EngagementReply, LessonBody, LessonUpdateBody, ModuleBody, ModuleUpdateBody,
            MutatedReply, PublishLessonBody, PublishLessonReply, QuestionBody,
            QuestionImportBody, QuestionUpdateBody,
        },
        error::ErrorResponse,
        middlewares,
    },
};

/// Per-request cap on bulk-import documents.
pub const BULK_IMPORT_MAX_DOCS: usize = 500;

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/check", get(admin_check_handler))
        .route("/modules", post(module_create_handler))
        .route(
            "/modules/{id}",
            put(module_update_handler).delete(module_delete_handler),
        )
        .route("/lessons", post(lesson_create_handler))
        .route(
            "/lessons/{id}",
            put(lesson_update_handler).delete(lesson_delete_handler),
        )
        .route("/lessons/{id}/questions", post(question_create_handler))
        .route(
            "/questions/{id}",
            put(question_update_handler).delete(question_delete_handler),
        )
        .route("/bulk-import", post(bulk_import_handler))
        .route("/publish-lesson", post(publish_lesson_handler))
        .route("/analytics/engagement", get(engagement_handler))
        .layer(middleware::from_fn(middlewares::require_admin_fn))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

fn validated_level(level: &str) -> WebResult<()> {
    if Level::parse(level).is_none() {
        return Err(WebError::validation(
            "Invalid level. Must be one of: beginner, intermediate, advanced",
        ));
    }
    Ok(())
}

fn validated_question(data: &QuestionCreate) -> WebResult<()> {
    if !QuestionKind::is_valid(&data.question_type) {
        return Err(WebError::validation(
            "Invalid type. Must be one of: mcq, short, code",
        ));
    }
    if data.question_type == "mcq"
        && !answer_key_references_choices(&data.choices, &data.answer_key)
    {
        return Err(WebError::validation(
            "Answer key must reference existing choice ids.",
        ));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/check",
    description = "Confirms the caller holds the admin role",
    responses(
        (status = 200, description = "Caller is an admin", body = CheckReply),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
    ),
    tag = "admin",
    security(
        ("bearer" = [])
    )
)]
async fn admin_check_handler() -> WebResult<impl IntoResponse> {
    Ok((StatusCode::OK, Json(CheckReply { is_admin: true })))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/modules",
    request_body = ModuleBody,
    responses(
        (status = 201, description = "Module created", body = CreatedReply),
        (status = 400, description = "Unknown level", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "admin",
    security(
        ("bearer" = [])
    )
)]
async fn module_create_handler(
    ctx: crate::web::RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<ModuleBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    validated_level(&payload.level)?;

    let created = Module::create(state.mm(), user, payload.into_create())
        .await
        .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedReply {
            id: created.id(),
            message: "Module created.".to_string(),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/modules/{id}",
    request_body = ModuleUpdateBody,
    description = "Partial module update: any subset of title, description, level, tags, order_index",
    responses(
        (status = 200, description = "Module updated", body = MutatedReply),
        (status = 400, description = "No fields or unknown level", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "admin",
    security(
        ("bearer" = [])
    )
)]
async fn module_update_handler(
    ctx: crate::web::RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ModuleUpdateBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    if payload.is_empty() {
        return Err(WebError::validation("No valid fields provided for update."));
    }
    if let Some(level) = payload.level.as_deref() {
        validated_level(level)?;
    }

    let found = Module::find_by_id(state.mm(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Module::get_resource_type()))?;

    let merged = payload.merged_with(&found);
    found
        .update(state.mm(), user, merged)
        .await
        .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(MutatedReply {
            message: "Module updated.".to_string(),
            id,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/modules/{id}",
    description = "Deletes a module; its lessons survive and become unassigned",
    responses(
        (status = 200, description = "Module deleted", body = MutatedReply),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "admin",
    security(
        ("bearer" = [])
    )
)]
async fn module_delete_handler(
    ctx: crate::web::RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let found = Module::find_by_id(state.mm(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Module::get_resource_type()))?;

    found
        .delete(state.mm(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(MutatedReply {
            message: "Module deleted.".to_string(),
            id,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/lessons",
    request_body = LessonBody,
    responses(
        (status = 201, description = "Lesson created", body = CreatedReply),
        (status = 404, description = "Referenced module not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "admin",
    security(
        ("bearer" = [])
    )
)]
async fn lesson_create_handler(
    ctx: crate::web::RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<LessonBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    if let Some(module_id) = payload.module_id {
        Module::find_by_id(state.mm(), user, module_id)
            .await
            .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?
            .ok_or_else(|| WebError::resource_not_found(Module::get_resource_type()))?;
    }

    let created = Lesson::create(state.mm(), user, payload.into_create())
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedReply {
            id: created.id(),
            message: "Lesson created.".to_string(),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/lessons/{id}",
    request_body = LessonUpdateBody,
    description = "Partial lesson update: any subset of the lesson fields",
    responses(
        (status = 200, description = "Lesson updated", body = MutatedReply),
        (status = 400, description = "No fields provided", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "admin",
    security(
        ("bearer" = [])
    )
)]
async fn lesson_update_handler(
    ctx: crate::web::RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LessonUpdateBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    if payload.is_empty() {
        return Err(WebError::validation("No valid fields provided for update."));
    }

    let found = Lesson::find_by_id(state.mm(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Lesson::get_resource_type()))?;

    let merged = payload.merged_with(&found);
    found
        .update(state.mm(), user, merged)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(MutatedReply {
            message: "Lesson updated.".to_string(),
            id,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/lessons/{id}",
    description = "Deletes a lesson together with its questions",
    responses(
        (status = 200, description = "Lesson deleted", body = MutatedReply),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "admin",
    security(
        ("bearer" = [])
    )
)]
async fn lesson_delete_handler(
    ctx: crate::web::RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let found = Lesson::find_by_id(state.mm(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Lesson::get_resource_type()))?;

    // questions go with it via the FK cascade
    found
        .delete(state.mm(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(MutatedReply {
            message: "Lesson deleted.".to_string(),
            id,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/lessons/{id}/questions",
    request_body = QuestionBody,
    responses(
        (status = 201, description = "Question added", body = CreatedReply),
        (status = 400, description = "Unknown type or dangling answer key", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "admin",
    security(
        ("bearer" = [])
    )
)]
async fn question_create_handler(
    ctx: crate::web::RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuestionBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    Lesson::find_by_id(state.mm(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Lesson::get_resource_type()))?;

    let data = payload.into_create(id);
    validated_question(&data)?;

    let created = Question::create(state.mm(), user, data)
        .await
        .map_err(|e| WebError::resource_fetch_error(Question::get_resource_type(), e))?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedReply {
            id: created.id(),
            message: "Question added.".to_string(),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/questions/{id}",
    request_body = QuestionUpdateBody,
    description = "Partial question update: any subset of the question fields",
    responses(
        (status = 200, description = "Question updated", body = MutatedReply),
        (status = 400, description = "No fields, unknown type or dangling answer key", body = ErrorResponse),
        (status = 404, description = "Question not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "admin",
    security(
        ("bearer" = [])
    )
)]
async fn question_update_handler(
    ctx: crate::web::RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuestionUpdateBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    if payload.is_empty() {
        return Err(WebError::validation("No valid fields provided for update."));
    }

    let found = Question::find_by_id(state.mm(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Question::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Question::get_resource_type()))?;

    let merged = payload.merged_with(&found);
    validated_question(&merged)?;

    found
        .update(state.mm(), user, merged)
        .await
        .map_err(|e| WebError::resource_fetch_error(Question::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(MutatedReply {
            message: "Question updated.".to_string(),
            id,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/questions/{id}",
    responses(
        (status = 200, description = "Question deleted", body = MutatedReply),
        (status = 404, description = "Question not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "admin",
    security(
        ("bearer" = [])
    )
)]
async fn question_delete_handler(
    ctx: crate::web::RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let found = Question::find_by_id(state.mm(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Question::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Question::get_resource_type()))?;

    found
        .delete(state.mm(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(Question::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(MutatedReply {
            message: "Question deleted.".to_string(),
            id,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/bulk-import",
    request_body = BulkImportBody,
    description = "Imports up to 500 documents into modules, lessons or questions in one transaction",
    responses(
        (status = 201, description = "Documents imported", body = BulkImportReply),
        (status = 400, description = "Bad collection, empty data, oversized batch or invalid document", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "admin",
    security(
        ("bearer" = [])
    )
)]
async fn bulk_import_handler(
    ctx: crate::web::RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<BulkImportBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    if payload.data.is_empty() {
        return Err(WebError::validation("'data' must be a non-empty array."));
    }
    if payload.data.len() > BULK_IMPORT_MAX_DOCS {
        return Err(WebError::validation(
            "Bulk import limited to 500 documents per request.",
        ));
    }

    let count = payload.data.len();
    let collection = payload.collection.as_str();

    let invalid_doc = |index: usize| {
        WebError::validation(format!("Invalid document at index {index} for '{collection}'."))
    };

    let ids = match collection {
        "modules" => {
            let mut items = Vec::with_capacity(count);
            for (i, doc) in payload.data.into_iter().enumerate() {
                let body: ModuleBody = serde_json::from_value(doc).map_err(|_| invalid_doc(i))?;
                validated_level(&body.level)?;
                items.push(body.into_create());
            }
            Module::create_many(state.mm(), user, items)
                .await
                .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?
        }
        "lessons" => {
            let mut items = Vec::with_capacity(count);
            for (i, doc) in payload.data.into_iter().enumerate() {
                let body: LessonBody = serde_json::from_value(doc).map_err(|_| invalid_doc(i))?;
                items.push(body.into_create());
            }
            Lesson::create_many(state.mm(), user, items)
                .await
                .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?
        }
        "questions" => {
            let mut items = Vec::with_capacity(count);
            for (i, doc) in payload.data.into_iter().enumerate() {
                let body: QuestionImportBody =
                    serde_json::from_value(doc).map_err(|_| invalid_doc(i))?;
                let data = body.question.into_create(body.lesson_id);
                validated_question(&data)?;
                items.push(data);
            }
            Question::create_many(state.mm(), user, items)
                .await
                .map_err(|e| WebError::resource_fetch_error(Question::get_resource_type(), e))?
        }
        _ => {
            return Err(WebError::validation(
                "Invalid collection. Must be one of: modules, lessons, questions",
            ));
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(BulkImportReply {
            message: format!("Imported {count} documents into {collection}."),
            imported_count: count,
            ids,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/publish-lesson",
    request_body = PublishLessonBody,
    responses(
        (status = 200, description = "Publish flag updated", body = PublishLessonReply),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "admin",
    security(
        ("bearer" = [])
    )
)]
async fn publish_lesson_handler(
    ctx: crate::web::RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<PublishLessonBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    Lesson::find_by_id(state.mm(), user, payload.lesson_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(Lesson::get_resource_type()))?;

    Lesson::set_published(state.mm(), user, payload.lesson_id, payload.published)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    let message = if payload.published {
        "Lesson published."
    } else {
        "Lesson unpublished."
    };

    Ok((
        StatusCode::OK,
        Json(PublishLessonReply {
            message: message.to_string(),
            lesson_id: payload.lesson_id,
            published: payload.published,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/analytics/engagement",
    description = "Per-lesson engagement rollup: responses, unique users, average score, completions, bookmarks. \
                   `order` flips the lesson creation-time ordering (asc|desc, default desc)",
    responses(
        (status = 200, description = "Engagement rows", body = EngagementReply),
        (status = 400, description = "Unknown order", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "admin",
    security(
        ("bearer" = [])
    )
)]
async fn engagement_handler(
    ctx: crate::web::RequestContext,
    State(state): State<AppState>,
    Query(query): Query<EngagementQuery>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let newest_first = match query.order.as_deref() {
        None | Some("desc") => true,
        Some("asc") => false,
        Some(_) => {
            return Err(WebError::validation("Invalid order. Must be one of: asc, desc"));
        }
    };

    let lessons = Lesson::all_by_creation(state.mm(), user, newest_first)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    let mut data = Vec::with_capacity(lessons.len());
    for lesson in lessons {
        let samples = ResponseEntity::samples_for_lesson(state.mm(), user, lesson.id())
            .await
            .map_err(|e| WebError::resource_fetch_error(ResponseEntity::get_resource_type(), e))?;
        let completions = ProgressEntity::count_completed_for_lesson(state.mm(), user, lesson.id())
            .await
            .map_err(|e| WebError::resource_fetch_error(ProgressEntity::get_resource_type(), e))?;
        let bookmarks = ProgressEntity::count_bookmarked_for_lesson(state.mm(), user, lesson.id())
            .await
            .map_err(|e| WebError::resource_fetch_error(ProgressEntity::get_resource_type(), e))?;

        data.push(summarize_lesson(
            lesson.id(),
            lesson.title(),
            &samples,
            completions,
            bookmarks,
        ));
    }

    Ok((StatusCode::OK, Json(EngagementReply { data })))
}
