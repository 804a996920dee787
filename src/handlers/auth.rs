// src/handlers/auth.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    config::Config,
    error::{AppError, ErrorBody},
    models::user::{LoginRequest, RegisterRequest, SessionResponse, User},
    store::Store,
    utils::session::{expired_session_cookie, session_cookie, session_token},
};

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created and the user object (excluding password).
#[utoipa::path(
    post,
    path = "/api/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    )
)]
pub async fn register(
    State(store): State<Arc<Store>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    // Argon2 is CPU bound; keep it off the async workers.
    let user = tokio::task::spawn_blocking(move || {
        store.create_user(&payload.email, &payload.password)
    })
    .await
    .map_err(|e| AppError::InternalServerError(e.to_string()))?
    .map_err(|e| {
        tracing::info!("Failed to register user: {}", e);
        AppError::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Authenticates a user and opens a cookie session.
///
/// Verifies the email and password against the store.
/// If valid, issues a session token in an HttpOnly cookie.
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in, session cookie set", body = User),
        (status = 401, description = "Invalid email or password", body = ErrorBody)
    )
)]
pub async fn login(
    State(store): State<Arc<Store>>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let auth_store = store.clone();
    let user = tokio::task::spawn_blocking(move || {
        auth_store.authenticate_user(&payload.email, &payload.password)
    })
    .await
    .map_err(|e| AppError::InternalServerError(e.to_string()))??;

    let token = store.create_session(user.id);
    let cookie = session_cookie(&token, config.session_ttl_secs);

    Ok(([(header::SET_COOKIE, cookie)], Json(user)))
}

/// Deletes the caller's session and expires the cookie.
#[utoipa::path(
    post,
    path = "/api/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Session deleted, cookie expired"),
        (status = 400, description = "No session cookie", body = ErrorBody)
    ),
    security(("session_cookie" = []))
)]
pub async fn logout(
    State(store): State<Arc<Store>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let token = session_token(&headers)
        .ok_or_else(|| AppError::BadRequest("no session cookie".to_string()))?;

    store.delete_session(&token);

    Ok((
        [(header::SET_COOKIE, expired_session_cookie())],
        Json(json!({ "message": "logged out" })),
    ))
}

/// Reports whether the request carries a live session.
#[utoipa::path(
    get,
    path = "/api/session",
    tag = "auth",
    responses((status = 200, description = "Session state", body = SessionResponse))
)]
pub async fn check_session(
    State(store): State<Arc<Store>>,
    headers: HeaderMap,
) -> Json<SessionResponse> {
    let user = session_token(&headers).and_then(|token| store.get_user_by_session(&token));

    Json(SessionResponse {
        authenticated: user.is_some(),
        user,
    })
}
