//! OpenAPI document for the REST API.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::dto::{
    ChatRequest, ChatResponse, ConfirmEventRequest, CredentialsRequest, EventFormResponse,
    EventListResponse, EventResponse, OAuthUrlResponse, PasswordResetRequest, SignUpResponse,
};
use super::handlers::system::{HealthResponse, SportsConfigResponse};
use super::handlers::{assistant, auth, events, system};
use crate::auth::{AuthUser, Session};
use crate::domain::{ChatMessage, ChatRole, DateFilter, EventSubmission, ExtractedEventData, Venue};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI description of every endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "sports-events", description = "Sports event management with an LLM-assisted event creator"),
    paths(
        system::health_handler,
        system::sports_handler,
        events::list_events,
        events::create_event,
        events::get_event,
        events::update_event,
        events::delete_event,
        assistant::chat,
        assistant::confirm_event,
        auth::sign_up,
        auth::sign_in,
        auth::sign_out,
        auth::reset_password,
        auth::google_oauth,
    ),
    components(schemas(
        HealthResponse,
        SportsConfigResponse,
        EventSubmission,
        EventResponse,
        EventListResponse,
        EventFormResponse,
        Venue,
        DateFilter,
        ChatRole,
        ChatMessage,
        ExtractedEventData,
        ChatRequest,
        ChatResponse,
        ConfirmEventRequest,
        CredentialsRequest,
        PasswordResetRequest,
        SignUpResponse,
        OAuthUrlResponse,
        AuthUser,
        Session,
        ErrorResponse,
        ErrorBody,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "Events", description = "Event CRUD, search and filtering"),
        (name = "Assistant", description = "Conversational event extraction"),
        (name = "Auth", description = "Proxied auth provider flows"),
        (name = "System", description = "Health and configuration"),
    )
)]
pub struct ApiDoc;

#[derive(Debug)]
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}
