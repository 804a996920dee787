// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    docs::{ApiDoc, OPENAPI_JSON_PATH, SWAGGER_UI_PATH},
    handlers::{assistant, attempt, auth, quiz},
    state::AppState,
    utils::session::auth_middleware,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, tests, attempts, assistant).
/// * Serves the OpenAPI document and Swagger UI.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Store, Assistant, Config).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::check_session));

    let ai_routes = Router::new()
        .route("/start", post(assistant::start_dialogue))
        .route("/{thread_id}/send", post(assistant::send_message));

    // Protected routes: a live session cookie is required.
    let protected_routes = Router::new()
        .route("/test/{test_id}", get(quiz::get_test))
        .route("/tests/{test_id}/attempt", post(quiz::start_attempt))
        .route(
            "/tests/{test_id}/attempts/history",
            get(quiz::get_attempt_history),
        )
        .route(
            "/attempt/{attempt_id}/question",
            get(attempt::get_attempt_questions),
        )
        .route(
            "/attempt/{attempt_id}/question/{question_position}",
            get(attempt::get_attempt_question),
        )
        .route(
            "/attempt/{attempt_id}/question/{question_position}/submit",
            post(attempt::post_question_answer),
        )
        .route("/attempt/{attempt_id}/submit", post(attempt::submit_attempt))
        .nest(
            "/attempt/{attempt_id}/question/{question_position}/ai",
            ai_routes,
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
        .nest("/api", auth_routes.merge(protected_routes))
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
