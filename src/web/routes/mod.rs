use crate::{
    Config,
    web::{AppState, doc::ApiDoc},
};
use axum::Router;
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod account;
pub mod admin;
pub mod catalog;
pub mod feedback;
pub mod practice;
pub mod progress;
pub mod roadmap;
pub mod search;

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct PaginationQuery {
    limit: Option<i64>,
    offset: Option<i64>,
}

impl PaginationQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

pub fn build_app<S: Send + Sync + Clone + 'static>(
    state: AppState,
    config: &'static Config,
) -> Router<S> {
    let learner = Router::new()
        .merge(catalog::routes(state.clone()))
        .merge(search::routes(state.clone()))
        .merge(roadmap::routes(state.clone()))
        .merge(practice::routes(state.clone()))
        .merge(progress::routes(state.clone()))
        .merge(feedback::routes(state.clone()));

    let mut router = Router::new()
        .nest("/api/v1/auth/", account::routes(state.clone()))
        .nest("/api/v1/admin/", admin::routes(state.clone()))
        .nest("/api/v1/", learner)
        .layer(CorsLayer::very_permissive())
        .with_state(state);

    if config.app().docs() {
        let openapi = ApiDoc::openapi();

        router = router.merge(SwaggerUi::new("/api/v1/docs").url("/api-doc/openapi.json", openapi));
    }

    router
}
