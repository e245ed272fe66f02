use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::{
    Config, auth,
    model::{CrudRepository, ResourceTyped, entity::UserEntity},
    web::{AppState, RequestContext, UserRole, context::AuthenticatedUser, error::WebError},
};

pub static BEARER_PREFIX: &str = "Bearer ";

/// Resolves `Authorization: Bearer <jwt>` into a [`RequestContext`].
///
/// A missing or non-Bearer header is not an error here: the request proceeds
/// anonymously and handlers decide whether authentication is required. A
/// present-but-invalid token is rejected so clients never mistake a broken
/// token for an anonymous session.
pub async fn extract_context_fn(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX));

    let token = match token {
        Some(token) => token.to_owned(),
        None => {
            req.extensions_mut().insert(RequestContext::new(None));
            return Ok(next.run(req).await);
        }
    };

    let claims = auth::process_token(&token, Config::get_or_init(false).await.app().jwt())
        .map_err(WebError::auth_token_invalid)?;

    let id = claims
        .claims
        .sub
        .parse::<uuid::Uuid>()
        .map_err(|_| WebError::auth_token_malformed())?;

    let user = UserEntity::find_by_id(state.mm(), &AuthenticatedUser::admin(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    match user {
        Some(user) => {
            let role = user.role();
            req.extensions_mut()
                .insert(RequestContext::new(Some(AuthenticatedUser::new(id, role))));

            Ok(next.run(req).await)
        }
        None => {
            req.extensions_mut().insert(RequestContext::new(None));
            Ok(next.run(req).await)
        }
    }
}

/// Gate for the admin console routes. Must run after [`extract_context_fn`].
pub async fn require_admin_fn(req: Request, next: Next) -> Result<Response, WebError> {
    let ctx = req
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or(RequestContext::new(None));

    let user = ctx.user()?;
    if user.user_role() != UserRole::Admin {
        return Err(WebError::admin_required());
    }

    Ok(next.run(req).await)
}
