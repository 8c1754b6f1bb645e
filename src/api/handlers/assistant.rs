//! Assistant handlers: chat round-trip and confirmation.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{ChatRequest, ChatResponse, ConfirmEventRequest, EventResponse};
use crate::api::extract::ApiJson;
use crate::app_state::AppState;
use crate::auth::CurrentUser;
use crate::error::{AppError, ErrorResponse};

/// `POST /assistant/chat` — Run one extraction round-trip.
///
/// # Errors
///
/// Returns [`AppError::Assistant`] when the model is not configured,
/// unavailable, or fails.
#[utoipa::path(
    post,
    path = "/api/v1/assistant/chat",
    tag = "Assistant",
    summary = "Chat with the event assistant",
    description = "Sends the conversation to the model and returns its reply plus any event fields extracted so far. Nothing is stored.",
    request_body = ChatRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse),
        (status = 400, description = "Empty conversation", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 502, description = "Model failed or unavailable", body = ErrorResponse),
        (status = 503, description = "Model not configured", body = ErrorResponse),
    )
)]
pub async fn chat(
    _user: CurrentUser,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    let extraction = state.assistant.chat(&req.messages, Utc::now()).await?;
    Ok(Json(ChatResponse {
        has_event_details: extraction.event_data.has_event_details(),
        reply: extraction.response,
        partial_event: extraction.event_data,
    }))
}

/// `POST /assistant/events` — Create an event from a confirmed extraction.
///
/// # Errors
///
/// Returns [`AppError::InvalidRequest`] when name, sport or start time is
/// missing, and [`AppError::Validation`] when the completed record fails
/// event validation.
#[utoipa::path(
    post,
    path = "/api/v1/assistant/events",
    tag = "Assistant",
    summary = "Confirm an extracted event",
    description = "Creates the event through the regular creation path. Missing venues default to \"Main Venue\".",
    request_body = ConfirmEventRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn confirm_event(
    user: CurrentUser,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ConfirmEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.assistant.confirm(user.id(), req.event).await?;
    Ok((StatusCode::CREATED, Json(EventResponse::from(event))))
}

/// Assistant routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/assistant/chat", post(chat))
        .route("/assistant/events", post(confirm_event))
}
