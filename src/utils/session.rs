// src/utils/session.rs

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::AppError, store::Store};

/// Name of the cookie carrying the opaque session token.
pub const SESSION_COOKIE: &str = "session_id";

/// Extracts the session token from the `Cookie` header(s), if present.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.to_string())
        .filter(|token| !token.is_empty())
}

/// `Set-Cookie` value issuing `token` for `ttl_secs` seconds.
pub fn session_cookie(token: &str, ttl_secs: u64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; Max-Age={ttl_secs}; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value instructing the browser to drop the session.
pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

/// Axum Middleware: Authentication.
///
/// Resolves the `session_id` cookie against the store.
/// If valid, injects the `User` into the request extensions for handlers to use.
/// If missing or unknown, returns 401 Unauthorized.
pub async fn auth_middleware(
    State(store): State<Arc<Store>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = session_token(req.headers()) else {
        tracing::info!("no session cookie found in auth middleware");
        return AppError::AuthError("no session cookie".to_string()).into_response();
    };

    match store.get_user_by_session(&token) {
        Some(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        None => AppError::AuthError("invalid session".to_string()).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn finds_session_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session_id=abc123; lang=en"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn missing_or_empty_session_cookie() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("session_id="));
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn cookie_values() {
        assert_eq!(
            session_cookie("abc", 60),
            "session_id=abc; Path=/; Max-Age=60; HttpOnly; SameSite=Lax"
        );
        assert!(expired_session_cookie().contains("Max-Age=0"));
    }
}
