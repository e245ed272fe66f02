use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    model::{
        ResourceTyped,
        entity::{Lesson, Module},
    },
    web::{
        AppState, AuthenticatedUser, WebError, WebResult,
        dto::search::{SearchItem, SearchPagination, SearchReply},
        error::ErrorResponse,
    },
};

// Per-kind fetch cap before the combined page is cut.
const SEARCH_FETCH_CAP: i64 = 200;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SearchQuery {
    q: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    limit: Option<i64>,
    cursor: Option<Uuid>,
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/search", get(search_handler))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/search",
    description = "Unified text search across modules and lessons. Params: q (required), type=lesson|module, limit, cursor",
    responses(
        (status = 200, description = "Combined search hits", body = SearchReply),
        (status = 400, description = "Missing query", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "search"
)]
async fn search_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> WebResult<impl IntoResponse> {
    let q = query.q.as_deref().map(str::trim).unwrap_or_default();
    if q.is_empty() {
        return Err(WebError::validation("Query parameter 'q' is required."));
    }

    let actor = AuthenticatedUser::admin();
    let page_size = query.limit.unwrap_or(20).clamp(1, 100);

    let mut results: Vec<SearchItem> = Vec::new();

    let want = |kind: &str| query.kind.as_deref().is_none_or(|k| k == kind);

    if want("lesson") {
        let lessons = Lesson::search(state.mm(), &actor, q, SEARCH_FETCH_CAP)
            .await
            .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;
        results.extend(lessons.into_iter().map(SearchItem::from));
    }

    if want("module") {
        let modules = Module::search(state.mm(), &actor, q, SEARCH_FETCH_CAP)
            .await
            .map_err(|e| WebError::resource_fetch_error(Module::get_resource_type(), e))?;
        results.extend(modules.into_iter().map(SearchItem::from));
    }

    // Cursor is the id of the last item of the previous page; an unknown
    // cursor just restarts from the top.
    let start = match query.cursor {
        Some(cursor) => results
            .iter()
            .position(|item| item.id() == cursor)
            .map(|i| i + 1)
            .unwrap_or(0),
        None => 0,
    };

    let remaining = results.len().saturating_sub(start);
    let has_more = remaining > page_size as usize;
    let data: Vec<SearchItem> = results
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect();

    let next_cursor = if has_more {
        data.last().map(|item| item.id())
    } else {
        None
    };

    Ok((
        StatusCode::OK,
        Json(SearchReply {
            data,
            pagination: SearchPagination {
                limit: page_size,
                has_more,
                next_cursor,
            },
        }),
    ))
}
