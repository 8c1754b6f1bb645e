//! Event DTOs for list, read, create and update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Event, EventId, Venue};

/// Query parameters for `GET /events`.
///
/// Every parameter is optional and an empty value means "not set". Unknown
/// `date` values behave like `all`; unknown `sort` fields fall back to the
/// start time.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListEventsParams {
    /// Free-text search over name, sport, description, location and venue names.
    #[serde(default)]
    pub search: Option<String>,
    /// Exact sport to match.
    #[serde(default)]
    pub sport: Option<String>,
    /// Date filter: `all`, `today`, `week`, `month`, `upcoming` or `past`.
    #[serde(default)]
    pub date: Option<String>,
    /// Ordering as `<field>-<direction>`, e.g. `date-desc` or `name-asc`.
    #[serde(default)]
    pub sort: Option<String>,
}

/// An event with its venues, as returned by list and create.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    /// Event identifier.
    #[schema(value_type = uuid::Uuid)]
    pub id: EventId,
    /// Event name.
    pub name: String,
    /// Sport type.
    pub sport: String,
    /// Start instant in UTC.
    pub starts_at: DateTime<Utc>,
    /// Description, if any.
    pub description: Option<String>,
    /// Location, if any.
    pub location: Option<String>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Linked venues.
    pub venues: Vec<Venue>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            sport: event.sport,
            starts_at: event.starts_at,
            description: event.description,
            location: event.location,
            created_at: event.created_at,
            venues: event.venues,
        }
    }
}

/// Response body for `GET /events`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventListResponse {
    /// Matching events in the requested order.
    pub data: Vec<EventResponse>,
    /// Number of events returned.
    pub total: usize,
}

impl From<Vec<Event>> for EventListResponse {
    fn from(events: Vec<Event>) -> Self {
        let data: Vec<EventResponse> = events.into_iter().map(EventResponse::from).collect();
        Self {
            total: data.len(),
            data,
        }
    }
}

/// A single event in the shape of an edit form: absent text fields are
/// empty strings and venues are reduced to their names.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventFormResponse {
    /// Event identifier.
    #[schema(value_type = uuid::Uuid)]
    pub id: EventId,
    /// Event name.
    pub name: String,
    /// Sport type.
    pub sport: String,
    /// Start instant in UTC.
    pub date_time: DateTime<Utc>,
    /// Description, `""` when absent.
    pub description: String,
    /// Location, `""` when absent.
    pub location: String,
    /// Linked venue names.
    pub venue_names: Vec<String>,
}

impl From<Event> for EventFormResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            sport: event.sport,
            date_time: event.starts_at,
            description: event.description.unwrap_or_default(),
            location: event.location.unwrap_or_default(),
            venue_names: event.venues.into_iter().map(|v| v.name).collect(),
        }
    }
}
