// src/handlers/attempt.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::{AppError, ErrorBody},
    models::{
        attempt::{Answer, Attempt, PostAnswerRequest},
        test::PublicQuestion,
        user::User,
    },
    store::Store,
};

/// Loads the attempt and checks it belongs to `user`.
///
/// Someone else's attempt is reported as missing.
pub(crate) fn owned_attempt(store: &Store, user: &User, attempt_id: u64) -> Result<Attempt, AppError> {
    store
        .get_attempt_by_id(attempt_id)
        .filter(|attempt| attempt.user_id == user.id)
        .ok_or(AppError::NotFound("attempt not found".to_string()))
}

/// Lists the attempt's questions in slot order, without answers.
#[utoipa::path(
    get,
    path = "/api/attempt/{attempt_id}/question",
    tag = "attempts",
    params(("attempt_id" = u64, Path, description = "Attempt id")),
    responses(
        (status = 200, description = "Questions in slot order", body = [PublicQuestion]),
        (status = 404, description = "Unknown attempt", body = ErrorBody)
    ),
    security(("session_cookie" = []))
)]
pub async fn get_attempt_questions(
    State(store): State<Arc<Store>>,
    Extension(user): Extension<User>,
    Path(attempt_id): Path<u64>,
) -> Result<impl IntoResponse, AppError> {
    owned_attempt(&store, &user, attempt_id)?;

    let questions: Vec<PublicQuestion> = store
        .get_attempt_questions(attempt_id)?
        .iter()
        .zip(1u64..)
        .map(|(question, position)| PublicQuestion::at_position(question, position))
        .collect();

    Ok(Json(questions))
}

/// Returns the question at a 1-indexed slot of the attempt.
#[utoipa::path(
    get,
    path = "/api/attempt/{attempt_id}/question/{question_position}",
    tag = "attempts",
    params(
        ("attempt_id" = u64, Path, description = "Attempt id"),
        ("question_position" = u64, Path, description = "1-indexed question slot")
    ),
    responses(
        (status = 200, description = "Question", body = PublicQuestion),
        (status = 400, description = "Position out of range", body = ErrorBody),
        (status = 404, description = "Unknown attempt", body = ErrorBody)
    ),
    security(("session_cookie" = []))
)]
pub async fn get_attempt_question(
    State(store): State<Arc<Store>>,
    Extension(user): Extension<User>,
    Path((attempt_id, position)): Path<(u64, u64)>,
) -> Result<impl IntoResponse, AppError> {
    owned_attempt(&store, &user, attempt_id)?;

    let questions = store.get_attempt_questions(attempt_id)?;
    let question = usize::try_from(position)
        .ok()
        .and_then(|p| p.checked_sub(1))
        .and_then(|index| questions.get(index))
        .ok_or_else(|| AppError::BadRequest(format!("question position {position} out of range")))?;

    Ok(Json(PublicQuestion::at_position(question, position)))
}

/// Records and grades an answer for one question slot.
#[utoipa::path(
    post,
    path = "/api/attempt/{attempt_id}/question/{question_position}/submit",
    tag = "attempts",
    params(
        ("attempt_id" = u64, Path, description = "Attempt id"),
        ("question_position" = u64, Path, description = "1-indexed question slot")
    ),
    request_body = PostAnswerRequest,
    responses(
        (status = 200, description = "Graded answer", body = Answer),
        (status = 400, description = "Position out of range", body = ErrorBody),
        (status = 403, description = "Deadline passed", body = ErrorBody),
        (status = 409, description = "Attempt already submitted", body = ErrorBody)
    ),
    security(("session_cookie" = []))
)]
pub async fn post_question_answer(
    State(store): State<Arc<Store>>,
    Extension(user): Extension<User>,
    Path((attempt_id, position)): Path<(u64, u64)>,
    Json(payload): Json<PostAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    owned_attempt(&store, &user, attempt_id)?;

    let answer = store.create_answer(attempt_id, position, &payload.text)?;

    Ok(Json(answer))
}

/// Closes the attempt and returns the final result.
#[utoipa::path(
    post,
    path = "/api/attempt/{attempt_id}/submit",
    tag = "attempts",
    params(("attempt_id" = u64, Path, description = "Attempt id")),
    responses(
        (status = 200, description = "Submitted attempt with final result", body = Attempt),
        (status = 403, description = "Deadline passed", body = ErrorBody),
        (status = 409, description = "Attempt already submitted", body = ErrorBody)
    ),
    security(("session_cookie" = []))
)]
pub async fn submit_attempt(
    State(store): State<Arc<Store>>,
    Extension(user): Extension<User>,
    Path(attempt_id): Path<u64>,
) -> Result<impl IntoResponse, AppError> {
    owned_attempt(&store, &user, attempt_id)?;

    let attempt = store.submit_attempt(attempt_id)?;
    tracing::info!(attempt_id, result = attempt.result, "attempt submitted");

    Ok(Json(attempt))
}
