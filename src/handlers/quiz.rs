// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::{AppError, ErrorBody},
    models::{
        attempt::{Attempt, StartAttemptRequest},
        test::PublicTest,
        user::User,
    },
    store::Store,
};

/// Returns a test's public description (no questions, no answers).
#[utoipa::path(
    get,
    path = "/api/test/{test_id}",
    tag = "tests",
    params(("test_id" = u64, Path, description = "Test id")),
    responses(
        (status = 200, description = "Test description", body = PublicTest),
        (status = 404, description = "Unknown test", body = ErrorBody)
    ),
    security(("session_cookie" = []))
)]
pub async fn get_test(
    State(store): State<Arc<Store>>,
    Path(test_id): Path<u64>,
) -> Result<impl IntoResponse, AppError> {
    let test = store
        .test_by_id(test_id)
        .ok_or(AppError::NotFound("test does not exist".to_string()))?;

    Ok(Json(PublicTest::from(&test)))
}

/// Starts a new attempt for the current user.
///
/// * Consumes one use of the supplied access code.
/// * Draws a random selection of the test's questions.
#[utoipa::path(
    post,
    path = "/api/tests/{test_id}/attempt",
    tag = "tests",
    params(("test_id" = u64, Path, description = "Test id")),
    request_body = StartAttemptRequest,
    responses(
        (status = 201, description = "Attempt started", body = Attempt),
        (status = 400, description = "Malformed access code", body = ErrorBody),
        (status = 403, description = "Access code rejected", body = ErrorBody),
        (status = 404, description = "Unknown test", body = ErrorBody)
    ),
    security(("session_cookie" = []))
)]
pub async fn start_attempt(
    State(store): State<Arc<Store>>,
    Extension(user): Extension<User>,
    Path(test_id): Path<u64>,
    Json(payload): Json<StartAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if store.test_by_id(test_id).is_none() {
        return Err(AppError::NotFound("test does not exist".to_string()));
    }

    store.validate_access_code(&payload.access_code, test_id)?;

    let attempt = store.create_attempt(test_id, user.id)?;
    tracing::info!(attempt_id = attempt.id, user_id = user.id, test_id, "attempt started");

    Ok((StatusCode::CREATED, Json(attempt)))
}

/// Lists the current user's submitted attempts at a test, newest first.
#[utoipa::path(
    get,
    path = "/api/tests/{test_id}/attempts/history",
    tag = "tests",
    params(("test_id" = u64, Path, description = "Test id")),
    responses((status = 200, description = "Submitted attempts, newest first", body = [Attempt])),
    security(("session_cookie" = []))
)]
pub async fn get_attempt_history(
    State(store): State<Arc<Store>>,
    Extension(user): Extension<User>,
    Path(test_id): Path<u64>,
) -> Result<impl IntoResponse, AppError> {
    let history = store.get_user_attempt_history(user.id, test_id)?;

    Ok(Json(history))
}
