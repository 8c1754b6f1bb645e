//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::auth::AuthClient;
use crate::service::{AssistantService, EventService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Event CRUD and search.
    pub events: Arc<EventService>,
    /// Event-extraction assistant.
    pub assistant: Arc<AssistantService>,
    /// Auth provider client, also used to resolve bearer tokens.
    pub auth: Arc<AuthClient>,
}
