//! Database row types for events and venues.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::{Event, EventId, Venue, VenueId};

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    /// Event id.
    pub id: EventId,
    /// Event name.
    pub name: String,
    /// Sport type.
    pub sport: String,
    /// Start instant.
    pub starts_at: DateTime<Utc>,
    /// Optional description.
    pub description: Option<String>,
    /// Optional location.
    pub location: Option<String>,
    /// Insert timestamp.
    pub created_at: DateTime<Utc>,
}

/// A venue joined through `event_venues`, tagged with the owning event.
#[derive(Debug, Clone, FromRow)]
pub struct LinkedVenueRow {
    /// Event the venue is linked to.
    pub event_id: EventId,
    /// Venue id.
    pub venue_id: VenueId,
    /// Venue name.
    pub venue_name: String,
}

impl EventRow {
    /// Attaches venues to the row.
    #[must_use]
    pub fn into_event(self, venues: Vec<Venue>) -> Event {
        Event {
            id: self.id,
            name: self.name,
            sport: self.sport,
            starts_at: self.starts_at,
            description: self.description,
            location: self.location,
            created_at: self.created_at,
            venues,
        }
    }
}
