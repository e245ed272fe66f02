use std::collections::HashSet;

use axum::{
    Json, Router, extract::State, http::StatusCode, middleware, response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::{
    core::roadmap::{Level, ModuleCompletion, compute_locks},
    model::{
        ResourceTyped,
        entity::{Lesson, Module, ProgressEntity},
    },
    web::{
        AppState, AuthenticatedUser, RequestContext, WebError, WebResult,
        dto::roadmap::{RoadmapModule, RoadmapReply},
        error::ErrorResponse,
        middlewares,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/roadmap", get(roadmap_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/roadmap",
    description = "All modules ordered beginner to advanced with their published lessons. \
                   Authenticated callers also get per-module percent and the locked flag",
    responses(
        (status = 200, description = "The roadmap", body = RoadmapReply),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "roadmap",
    security(
        (),
        ("bearer" = [])
    )
)]
async fn roadmap_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let actor = AuthenticatedUser::admin();

    let mut modules = Module::all_by_creation(state.mm(), &actor)
        .await
        .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?;

    // Stable by-level sort keeps creation order within each level.
    modules.sort_by_key(|m| Level::rank(m.level()));

    let mut lesson_refs = Vec::with_capacity(modules.len());
    for module in &modules {
        let refs = Lesson::published_refs_by_module(state.mm(), &actor, module.id())
            .await
            .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;
        lesson_refs.push(refs);
    }

    let Some(user) = ctx.maybe_user() else {
        let nodes = modules
            .iter()
            .zip(lesson_refs)
            .map(|(module, refs)| RoadmapModule::new(module, refs))
            .collect();
        return Ok((StatusCode::OK, Json(RoadmapReply { modules: nodes })));
    };

    let progress = ProgressEntity::all_for_user(state.mm(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(ProgressEntity::get_resource_type(), e))?;
    let completed_lessons: HashSet<Uuid> = progress
        .iter()
        .filter(|p| p.status() == "completed")
        .map(|p| p.lesson_id())
        .collect();

    let completions: Vec<ModuleCompletion> = lesson_refs
        .iter()
        .map(|refs| ModuleCompletion {
            completed: refs
                .iter()
                .filter(|l| completed_lessons.contains(&l.id))
                .count() as i64,
            total: refs.len() as i64,
        })
        .collect();

    let nodes: Vec<RoadmapModule> = modules
        .iter()
        .zip(lesson_refs)
        .map(|(module, refs)| RoadmapModule::new(module, refs))
        .collect();

    let locks = compute_locks(&completions);
    let overlaid = nodes
        .into_iter()
        .zip(completions.iter().zip(locks))
        .map(|(node, (completion, locked))| node.with_overlay(completion.percent(), locked))
        .collect();

    Ok((StatusCode::OK, Json(RoadmapReply { modules: overlaid })))
}
