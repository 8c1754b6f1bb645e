//! sports-events server entry point.
//!
//! Loads configuration, connects to PostgreSQL, applies migrations, and
//! starts the Axum HTTP server.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use sports_events::ai::GeminiClient;
use sports_events::api;
use sports_events::app_state::AppState;
use sports_events::auth::AuthClient;
use sports_events::config::{AppConfig, LogFormat};
use sports_events::persistence::{EventStore, MIGRATOR};
use sports_events::service::{AssistantService, EventService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::from_env().context("invalid configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting sports-events");

    // Connect to the store
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    if config.run_migrations {
        MIGRATOR
            .run(&pool)
            .await
            .context("failed to apply migrations")?;
        tracing::info!("migrations applied");
    }

    // Build service layer
    let gemini = GeminiClient::from_config(&config);
    if !gemini.is_configured() {
        tracing::warn!("GEMINI_API_KEY not set; assistant requests will fail");
    }
    let events = Arc::new(EventService::new(EventStore::new(pool)));
    let assistant = Arc::new(AssistantService::new(gemini, Arc::clone(&events)));
    let auth = Arc::new(AuthClient::from_config(&config));

    // Build application state
    let app_state = AppState {
        events,
        assistant,
        auth,
    };

    // Build router
    let app = api::app(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
