//! Token issuance, registration, and the current-user profile.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tracing::{info, warn};

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use fintrack_core::auth::{hash_password, validate_registration, verify_password};
use fintrack_db::{
    UserRepository, entities::users, repositories::user::CreateUserInput,
};
use fintrack_shared::{
    AppError, TokenType,
    auth::{AccessToken, RefreshRequest, RegisterRequest, TokenRequest, UserInfo},
};

/// Public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/token", post(obtain_token))
        .route("/token/refresh", post(refresh_token))
        .route("/register", post(register))
}

/// Auth routes that require a valid access token.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/user", get(current_user))
}

pub(crate) fn user_info(user: users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        username: user.username,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        is_staff: user.is_staff,
        date_joined: user.date_joined.into(),
    }
}

fn invalid_credentials() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "no_active_account",
            "message": "No active account found with the given credentials"
        })),
    )
        .into_response()
}

fn invalid_refresh() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "token_not_valid",
            "message": "Token is invalid or expired"
        })),
    )
        .into_response()
}

/// POST `/token` - Exchange credentials for an access/refresh pair.
async fn obtain_token(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> ApiResult<Response> {
    let repo = UserRepository::new(state.db());

    let Some(user) = repo.find_by_username(&payload.username).await? else {
        info!(username = %payload.username, "Token request for unknown user");
        return Ok(invalid_credentials());
    };

    if !user.is_active {
        info!(user_id = %user.id, "Token request for inactive user");
        return Ok(invalid_credentials());
    }

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "Token request with wrong password");
        return Ok(invalid_credentials());
    }

    let pair = state
        .jwt_service
        .generate_pair(user.id, &user.username, user.is_staff)?;

    info!(user_id = %user.id, "Tokens issued");
    Ok((StatusCode::OK, Json(pair)).into_response())
}

/// POST `/token/refresh` - Exchange a refresh token for a new access token.
async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<Response> {
    let claims = match state
        .jwt_service
        .validate_typed(&payload.refresh, TokenType::Refresh)
    {
        Ok(claims) => claims,
        Err(e) => {
            info!(error = %e, "Refresh token rejected");
            return Ok(invalid_refresh());
        }
    };

    let repo = UserRepository::new(state.db());
    let user = match repo.find_by_id(claims.user_id()).await? {
        Some(user) if user.is_active => user,
        _ => {
            warn!(user_id = %claims.user_id(), "Refresh for missing or inactive user");
            return Ok(invalid_refresh());
        }
    };

    let access = state
        .jwt_service
        .generate_access_token(user.id, &user.username, user.is_staff)?;

    Ok((StatusCode::OK, Json(AccessToken { access })).into_response())
}

/// POST `/register` - Create a user account.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<Response> {
    validate_registration(
        &payload.username,
        &payload.email,
        &payload.password,
        &payload.password2,
    )?;

    let repo = UserRepository::new(state.db());

    if repo.username_exists(&payload.username).await? {
        return Err(
            AppError::Conflict("A user with that username already exists.".into()).into(),
        );
    }
    if repo.email_exists(&payload.email).await? {
        return Err(
            AppError::Conflict("A user with that email already exists.".into()).into(),
        );
    }

    let password_hash = hash_password(&payload.password)?;

    let user = repo
        .create(CreateUserInput {
            username: payload.username,
            email: payload.email,
            password_hash,
            first_name: payload.first_name,
            last_name: payload.last_name,
            is_staff: false,
        })
        .await?;

    info!(user_id = %user.id, username = %user.username, "User registered");
    Ok((StatusCode::CREATED, Json(user_info(user))).into_response())
}

/// GET `/user` - Profile of the authenticated user.
async fn current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UserInfo>> {
    let repo = UserRepository::new(state.db());

    let user = repo
        .find_by_id(auth.user_id())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(Json(user_info(user)))
}
