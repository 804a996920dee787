// src/docs.rs

use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

use crate::{
    error::ErrorBody,
    handlers::{assistant, attempt, auth, quiz},
    models::{
        ai_thread::{AIThread, AssistantReply, SendMessageRequest, ThreadStatus},
        attempt::{Answer, Attempt, AttemptStatus, PostAnswerRequest, StartAttemptRequest},
        test::{PublicQuestion, PublicTest},
        user::{LoginRequest, RegisterRequest, SessionResponse, User},
    },
    utils::session::SESSION_COOKIE,
};

/// Where the generated OpenAPI document is served.
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Where the Swagger UI is mounted.
pub const SWAGGER_UI_PATH: &str = "/swagger";

/// OpenAPI description of the HTTP API.
#[derive(OpenApi)]
#[openapi(
    info(title = "Quiz backend API"),
    paths(
        auth::register,
        auth::login,
        auth::logout,
        auth::check_session,
        quiz::get_test,
        quiz::start_attempt,
        quiz::get_attempt_history,
        attempt::get_attempt_questions,
        attempt::get_attempt_question,
        attempt::post_question_answer,
        attempt::submit_attempt,
        assistant::start_dialogue,
        assistant::send_message,
    ),
    components(schemas(
        ErrorBody,
        User,
        RegisterRequest,
        LoginRequest,
        SessionResponse,
        PublicTest,
        PublicQuestion,
        Attempt,
        AttemptStatus,
        Answer,
        StartAttemptRequest,
        PostAnswerRequest,
        AIThread,
        ThreadStatus,
        SendMessageRequest,
        AssistantReply,
    )),
    modifiers(&SessionCookie),
    tags(
        (name = "auth", description = "Accounts and cookie sessions"),
        (name = "tests", description = "Test descriptions and starting attempts"),
        (name = "attempts", description = "Answering and submitting attempts"),
        (name = "assistant", description = "Per-question assistant dialogue")
    )
)]
pub struct ApiDoc;

/// Registers the `session_cookie` scheme referenced by protected paths.
struct SessionCookie;

impl Modify for SessionCookie {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        assert_eq!(doc.paths.paths.len(), 13);
        assert!(doc.paths.paths.contains_key("/api/tests/{test_id}/attempt"));
        assert!(
            doc.paths
                .paths
                .contains_key("/api/attempt/{attempt_id}/question/{question_position}/ai/{thread_id}/send")
        );
    }

    #[test]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("session_cookie"));
    }
}
