//! Event handlers: list, create, get, update, delete.
//!
//! Every route requires a bearer token; the resolved user id scopes all
//! store access.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{EventFormResponse, EventListResponse, EventResponse, ListEventsParams};
use crate::api::extract::{ApiJson, ApiPath};
use crate::app_state::AppState;
use crate::auth::CurrentUser;
use crate::domain::{EventId, EventQuery, EventSubmission};
use crate::error::{AppError, ErrorResponse};

/// `GET /events` — List the caller's events.
///
/// # Errors
///
/// Returns [`AppError::Unauthorized`] without a valid token, or
/// [`AppError::Persistence`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    summary = "List events",
    description = "Returns the caller's events with their venues. Filters combine with AND; the search term matches name, sport, description, location or a linked venue's name.",
    params(ListEventsParams),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Matching events", body = EventListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn list_events(
    user: CurrentUser,
    State(state): State<AppState>,
    Query(params): Query<ListEventsParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = EventQuery::from_params(
        params.search.as_deref(),
        params.sport.as_deref(),
        params.date.as_deref(),
        params.sort.as_deref(),
        Utc::now(),
    );
    let events = state.events.list(user.id(), query).await?;
    Ok(Json(EventListResponse::from(events)))
}

/// `POST /events` — Create an event.
///
/// # Errors
///
/// Returns [`AppError::Validation`] for invalid fields,
/// [`AppError::Unauthorized`] without a valid token, or
/// [`AppError::Persistence`] on store failure.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    summary = "Create an event",
    description = "Validates the submission, creates the event, creates any venue not yet known by exact name, and links them.",
    request_body = EventSubmission,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn create_event(
    user: CurrentUser,
    State(state): State<AppState>,
    ApiJson(submission): ApiJson<EventSubmission>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.events.create(user.id(), &submission).await?;
    Ok((StatusCode::CREATED, Json(EventResponse::from(event))))
}

/// `GET /events/{id}` — Get one event in edit-form shape.
///
/// # Errors
///
/// Returns [`AppError::EventNotFound`] if the event is missing or not owned
/// by the caller.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Get an event",
    description = "Returns the event with absent text fields as empty strings and venues as names, ready to pre-fill an edit form.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Event", body = EventFormResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Event not found or unauthorized", body = ErrorResponse),
    )
)]
pub async fn get_event(
    user: CurrentUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<uuid::Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.events.get(user.id(), EventId::from_uuid(id)).await?;
    Ok(Json(EventFormResponse::from(event)))
}

/// `PUT /events/{id}` — Replace an event and its venue links.
///
/// # Errors
///
/// Returns [`AppError::Validation`] for invalid fields or
/// [`AppError::EventNotFound`] if the caller does not own the event.
#[utoipa::path(
    put,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Update an event",
    description = "Overwrites every field and replaces the venue links. Link removal and re-creation are separate statements.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    request_body = EventSubmission,
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Event updated"),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Event not found or unauthorized", body = ErrorResponse),
    )
)]
pub async fn update_event(
    user: CurrentUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<uuid::Uuid>,
    ApiJson(submission): ApiJson<EventSubmission>,
) -> Result<impl IntoResponse, AppError> {
    state
        .events
        .update(user.id(), EventId::from_uuid(id), &submission)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /events/{id}` — Delete an event and its venue links.
///
/// # Errors
///
/// Returns [`AppError::EventNotFound`] if the caller does not own the event.
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Delete an event",
    description = "Removes the event's venue links, then the event. Venues are kept.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Event not found or unauthorized", body = ErrorResponse),
    )
)]
pub async fn delete_event(
    user: CurrentUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<uuid::Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.events.delete(user.id(), EventId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Event routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
}
