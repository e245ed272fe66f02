use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Duration;

use crate::{
    Config,
    auth::{self, UserClaims, hash_password, verify_password},
    model::{
        CrudRepository, ResourceTyped,
        entity::{Lesson, ProgressEntity, UserEntity, UserEntityCreateUpdate},
    },
    web::{
        AppState, AuthenticatedUser, RequestContext, WebError, WebResult,
        dto::account::{MeProgress, MeReply, SigninBody, SignupBody, TokenReply, UserProfile, percent_complete},
        error::ErrorResponse,
        middlewares,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    let protected = Router::new()
        .route("/me", get(auth_me_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ));

    Router::new()
        .route("/signup", post(auth_signup_handler))
        .route("/signin", post(auth_signin_handler))
        .merge(protected)
        .with_state(state)
}

async fn issue_token(user: &UserEntity) -> WebResult<String> {
    let timestamp = (chrono::Utc::now() + Duration::days(1)).timestamp();
    let jwt_secret = Config::get_or_init(false).await.app().jwt();

    let claims = UserClaims {
        sub: user.id().to_string(),
        exp: timestamp,
    };
    auth::generate_token(claims, jwt_secret).map_err(|e| WebError::server_crypt_error(e.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignupBody,
    description = "Creates a learner account and returns a bearer token",
    responses(
        (status = 200, description = "Account created", body = TokenReply),
        (status = 409, description = "User already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "auth"
)]
async fn auth_signup_handler(
    State(state): State<AppState>,
    Json(payload): Json<SignupBody>,
) -> WebResult<impl IntoResponse> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(WebError::validation(
            "Missing required fields: username, password",
        ));
    }

    let admin = AuthenticatedUser::admin();
    let found = UserEntity::find_by_username(state.mm(), &admin, &payload.username)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    if found.is_some() {
        return Err(WebError::registration_conflict());
    }

    let hash = hash_password(&payload.password).map_err(WebError::server_crypt_error)?;
    let payload = UserEntityCreateUpdate {
        username: payload.username,
        email: payload.email,
        password_hash: hash,
        role: "user".to_string(),
    };

    let created = UserEntity::create(state.mm(), &admin, payload)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    let token = issue_token(&created).await?;

    Ok((
        StatusCode::OK,
        Json(TokenReply {
            token,
            user: UserProfile::from(&created),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/signin",
    description = "Authorizes a user and returns a bearer token",
    request_body = SigninBody,
    responses(
        (status = 200, description = "User signed in", body = TokenReply),
        (status = 401, description = "Credentials invalid", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "auth",
)]
async fn auth_signin_handler(
    State(state): State<AppState>,
    Json(payload): Json<SigninBody>,
) -> WebResult<impl IntoResponse> {
    let admin = AuthenticatedUser::admin();
    let found = UserEntity::find_by_username(state.mm(), &admin, &payload.username)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    let Some(found) = found else {
        return Err(WebError::auth_invalid_credentials());
    };

    let is_verified =
        verify_password(found.hash(), &payload.password).map_err(WebError::server_crypt_error)?;

    if !is_verified {
        return Err(WebError::auth_invalid_credentials());
    }

    let token = issue_token(&found).await?;

    Ok((
        StatusCode::OK,
        Json(TokenReply {
            token,
            user: UserProfile::from(&found),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    description = "Current user profile with a progress summary",
    responses(
        (status = 200, description = "Profile and progress", body = MeReply),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "auth",
    security(
        ("bearer" = [])
    )
)]
async fn auth_me_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let found = UserEntity::find_by_id(state.mm(), user, user.user_id())
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(UserEntity::get_resource_type()))?;

    let completed = ProgressEntity::count_for_user_by_status(state.mm(), user, "completed")
        .await
        .map_err(|e| WebError::resource_fetch_error(ProgressEntity::get_resource_type(), e))?;
    let in_progress = ProgressEntity::count_for_user_by_status(state.mm(), user, "in_progress")
        .await
        .map_err(|e| WebError::resource_fetch_error(ProgressEntity::get_resource_type(), e))?;
    let total_lessons = Lesson::count_published(state.mm(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    let reply = MeReply {
        profile: UserProfile::from(&found),
        progress: MeProgress {
            total_lessons,
            completed,
            in_progress,
            percent_complete: percent_complete(completed, total_lessons),
        },
    };

    Ok((StatusCode::OK, Json(reply)))
}
