//! Event service: validation, ownership checks and venue resolution around
//! the store.

use chrono::Utc;

use crate::domain::{Event, EventId, EventQuery, EventSubmission, UserId, ValidatedEvent, Venue, VenueId};
use crate::error::AppError;
use crate::persistence::EventStore;

/// Orchestrates every event operation for an authenticated user.
///
/// Each method follows the same order: validate input, check ownership,
/// write the event row, resolve venues, then replace links. Submissions are
/// validated before the store is touched.
#[derive(Debug, Clone)]
pub struct EventService {
    store: EventStore,
}

impl EventService {
    /// Creates a new `EventService`.
    #[must_use]
    pub fn new(store: EventStore) -> Self {
        Self { store }
    }

    /// Lists the user's events matching `query`.
    ///
    /// When a search term is present, events linked to a matching venue are
    /// folded into the search before the main query runs.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store failure.
    pub async fn list(&self, user: UserId, mut query: EventQuery) -> Result<Vec<Event>, AppError> {
        if let Some(search) = query.search.take() {
            let linked = self.store.event_ids_by_venue_name(&search.pattern()).await?;
            query.search = Some(search.with_venue_matches(linked));
        }
        let events = self.store.list_events(user, &query).await?;
        tracing::debug!(%user, count = events.len(), "events listed");
        Ok(events)
    }

    /// Fetches one of the user's events.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::EventNotFound`] if the event is missing or owned
    /// by someone else, or [`AppError::Persistence`] on store failure.
    pub async fn get(&self, user: UserId, id: EventId) -> Result<Event, AppError> {
        self.store
            .get_event(user, id)
            .await?
            .ok_or(AppError::EventNotFound)
    }

    /// Validates and creates an event with its venues.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for invalid input, or
    /// [`AppError::Persistence`] on store failure.
    pub async fn create(&self, user: UserId, submission: &EventSubmission) -> Result<Event, AppError> {
        let event = submission.validate().map_err(AppError::Validation)?;
        let id = EventId::new();

        let row = self.store.insert_event(user, id, &event).await?;
        let venues = self.resolve_venues(&event).await?;
        self.store.link_venues(id, &venue_ids(&venues)).await?;

        tracing::info!(event_id = %id, %user, venues = venues.len(), "event created");
        Ok(row.into_event(venues))
    }

    /// Validates and overwrites one of the user's events, replacing its
    /// venue links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for invalid input,
    /// [`AppError::EventNotFound`] if the user does not own the event, or
    /// [`AppError::Persistence`] on store failure.
    pub async fn update(
        &self,
        user: UserId,
        id: EventId,
        submission: &EventSubmission,
    ) -> Result<(), AppError> {
        let event = submission.validate().map_err(AppError::Validation)?;
        self.ensure_owned(user, id).await?;

        self.store.update_event(id, &event).await?;
        let removed = self.store.unlink_venues(id).await?;
        let venues = self.resolve_venues(&event).await?;
        self.store.link_venues(id, &venue_ids(&venues)).await?;

        tracing::info!(event_id = %id, %user, removed, linked = venues.len(), "event updated");
        Ok(())
    }

    /// Deletes one of the user's events and its venue links. Venues
    /// themselves are kept.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::EventNotFound`] if the user does not own the
    /// event, or [`AppError::Persistence`] on store failure.
    pub async fn delete(&self, user: UserId, id: EventId) -> Result<(), AppError> {
        self.ensure_owned(user, id).await?;
        self.store.unlink_venues(id).await?;
        self.store.delete_event(id).await?;
        tracing::info!(event_id = %id, %user, deleted_at = %Utc::now(), "event deleted");
        Ok(())
    }

    async fn ensure_owned(&self, user: UserId, id: EventId) -> Result<(), AppError> {
        if self.store.owns_event(user, id).await? {
            Ok(())
        } else {
            Err(AppError::EventNotFound)
        }
    }

    // Every name is resolved before any link is written.
    async fn resolve_venues(&self, event: &ValidatedEvent) -> Result<Vec<Venue>, AppError> {
        let mut venues = Vec::with_capacity(event.venue_names.len());
        for name in &event.venue_names {
            venues.push(self.store.find_or_create_venue(name).await?);
        }
        Ok(venues)
    }
}

fn venue_ids(venues: &[Venue]) -> Vec<VenueId> {
    venues.iter().map(|v| v.id).collect()
}
