// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

use crate::{ai::AssistantError, store::StoreError};

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    AuthError(String),

    // 403 Forbidden (access code rejected, deadline passed)
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., duplicate email, attempt already submitted)
    Conflict(String),

    // 502 Bad Gateway (assistant service failed)
    UpstreamError(String),

    // 504 Gateway Timeout (assistant service too slow)
    UpstreamTimeout(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::UpstreamError(msg) => {
                tracing::warn!("Assistant failure: {}", msg);
                (StatusCode::BAD_GATEWAY, "Assistant unavailable".to_string())
            }
            AppError::UpstreamTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
        };
        let body = Json(ErrorBody {
            error: error_message,
        });

        (status, body).into_response()
    }
}

/// Maps store failures to their HTTP meaning.
/// Allows using `?` operator on store operations.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let msg = err.to_string();
        match err {
            StoreError::NotFound(_) => AppError::NotFound(msg),
            StoreError::Conflict(_) => AppError::Conflict(msg),
            StoreError::InvalidCredentials => AppError::AuthError(msg),
            StoreError::InvalidCode
            | StoreError::WrongTest
            | StoreError::Expired(_)
            | StoreError::LimitReached => AppError::Forbidden(msg),
            StoreError::OutOfRange { .. } => AppError::BadRequest(msg),
            StoreError::Inconsistent(_) | StoreError::Hashing(_) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl From<AssistantError> for AppError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::Timeout(_) => AppError::UpstreamTimeout(err.to_string()),
            other => AppError::UpstreamError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
