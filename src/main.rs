// src/main.rs

use std::sync::Arc;

use quiz_backend::ai::OpenAiClient;
use quiz_backend::config::Config;
use quiz_backend::models::test::Test;
use quiz_backend::routes;
use quiz_backend::state::AppState;
use quiz_backend::store::{Store, seed_tests};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load configuration from .env and the environment
    let config = Config::from_env()?;

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Build and seed the in-memory store
    let store = Arc::new(Store::default());
    bootstrap(&store, &config)?;
    tracing::info!("Store seeded.");

    let assistant = OpenAiClient::new(
        &config.openai_api_key,
        config.openai_assistant_id.clone(),
        config.openai_base_url.clone(),
    )?;

    // Create AppState
    let state = AppState {
        store,
        assistant: Arc::new(assistant),
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    tracing::info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    // Start the server
    axum::serve(listener, app).await?;
    Ok(())
}

/// Seeds the store. A configured catalog file replaces the built-in test.
fn bootstrap(store: &Store, config: &Config) -> Result<(), BoxError> {
    let tests: Vec<Test> = match &config.catalog_path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            serde_json::from_str(&raw)?
        }
        None => seed_tests(),
    };
    tracing::info!("Loading {} tests into the catalog", tests.len());
    store.seed_with_catalog(tests)?;
    Ok(())
}
