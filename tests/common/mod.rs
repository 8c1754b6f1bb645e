//! Shared fixtures: a lazily-connected app and in-process stub servers.

#![allow(clippy::panic, dead_code)]

use std::sync::Arc;

use axum::Router;
use sqlx::postgres::PgPoolOptions;

use sports_events::ai::GeminiClient;
use sports_events::app_state::AppState;
use sports_events::auth::AuthClient;
use sports_events::persistence::EventStore;
use sports_events::service::{AssistantService, EventService};

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_stub(router: Router) -> String {
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("failed to bind stub listener");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("stub listener has no address");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

/// App state whose store never connects. Requests that reach the database
/// fail; everything rejected earlier behaves normally.
pub fn offline_state(auth_url: &str, gemini: GeminiClient) -> AppState {
    let Ok(pool) = PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_millis(200))
        .connect_lazy("postgres://offline@127.0.0.1:1/none")
    else {
        panic!("lazy pool should build without connecting");
    };
    let events = Arc::new(EventService::new(EventStore::new(pool)));
    let assistant = Arc::new(AssistantService::new(gemini, Arc::clone(&events)));
    let auth = Arc::new(AuthClient::new(auth_url, None, "http://localhost:3000"));
    AppState {
        events,
        assistant,
        auth,
    }
}
