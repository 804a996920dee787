// src/handlers/assistant.rs

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    ai::{self, Assistant, DEFAULT_POLL_INTERVAL},
    config::Config,
    error::{AppError, ErrorBody},
    handlers::attempt::owned_attempt,
    models::{
        ai_thread::{AIThread, AssistantReply, SendMessageRequest},
        user::User,
    },
    store::Store,
    utils::html::clean_html,
};

/// Opens an assistant conversation for one question slot of the attempt.
///
/// The slot is checked first so a rejected request never creates a remote
/// thread. The thread is created outside the store lock and the binding is
/// recorded afterwards. Slot 1 may be restarted, other slots only once.
#[utoipa::path(
    post,
    path = "/api/attempt/{attempt_id}/question/{question_position}/ai/start",
    tag = "assistant",
    params(
        ("attempt_id" = u64, Path, description = "Attempt id"),
        ("question_position" = u64, Path, description = "1-indexed question slot")
    ),
    responses(
        (status = 201, description = "Thread bound to the slot", body = AIThread),
        (status = 400, description = "Position out of range", body = ErrorBody),
        (status = 409, description = "Slot already has a thread", body = ErrorBody),
        (status = 502, description = "Assistant unavailable", body = ErrorBody),
        (status = 504, description = "Assistant timed out", body = ErrorBody)
    ),
    security(("session_cookie" = []))
)]
pub async fn start_dialogue(
    State(store): State<Arc<Store>>,
    State(assistant): State<Arc<dyn Assistant>>,
    State(config): State<Config>,
    Extension(user): Extension<User>,
    Path((attempt_id, position)): Path<(u64, u64)>,
) -> Result<impl IntoResponse, AppError> {
    owned_attempt(&store, &user, attempt_id)?;
    store.check_deadline(attempt_id)?;
    store.check_ai_slot(attempt_id, position)?;

    let budget = Duration::from_secs(config.ai_timeout_secs);
    let thread_id = tokio::time::timeout(budget, assistant.create_thread())
        .await
        .map_err(|_| AppError::from(ai::AssistantError::Timeout(budget)))?
        .map_err(|e| {
            tracing::error!("Failed to create assistant thread: {}", e);
            AppError::from(e)
        })?;

    let thread = store.create_ai_thread(attempt_id, position, &thread_id)?;

    Ok((StatusCode::CREATED, Json(thread)))
}

/// Sends a message on the slot's assistant thread and waits for the reply.
#[utoipa::path(
    post,
    path = "/api/attempt/{attempt_id}/question/{question_position}/ai/{thread_id}/send",
    tag = "assistant",
    params(
        ("attempt_id" = u64, Path, description = "Attempt id"),
        ("question_position" = u64, Path, description = "1-indexed question slot"),
        ("thread_id" = String, Path, description = "Thread bound to the slot")
    ),
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Sanitized assistant reply", body = AssistantReply),
        (status = 404, description = "Thread not bound to the slot", body = ErrorBody),
        (status = 502, description = "Assistant unavailable", body = ErrorBody),
        (status = 504, description = "Assistant timed out", body = ErrorBody)
    ),
    security(("session_cookie" = []))
)]
pub async fn send_message(
    State(store): State<Arc<Store>>,
    State(assistant): State<Arc<dyn Assistant>>,
    State(config): State<Config>,
    Extension(user): Extension<User>,
    Path((attempt_id, position, thread_id)): Path<(u64, u64, String)>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    owned_attempt(&store, &user, attempt_id)?;
    store.check_deadline(attempt_id)?;

    let bound = store
        .ai_thread(attempt_id, position)
        .filter(|thread| thread.thread_id == thread_id)
        .ok_or(AppError::NotFound("thread not found".to_string()))?;

    let reply = ai::ask(
        assistant.as_ref(),
        &bound.thread_id,
        &payload.message,
        Duration::from_secs(config.ai_timeout_secs),
        DEFAULT_POLL_INTERVAL,
    )
    .await
    .map_err(|e| {
        tracing::error!(attempt_id, position, "Assistant exchange failed: {}", e);
        AppError::from(e)
    })?;

    Ok(Json(AssistantReply {
        thread_id: bound.thread_id,
        reply: clean_html(&reply),
    }))
}
