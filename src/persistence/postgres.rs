//! PostgreSQL implementation of the event store.
//!
//! Every statement runs directly on the pool. Multi-step writes (event row,
//! venue resolution, link replacement) are not wrapped in a transaction, so
//! concurrent updates of the same event may interleave their link steps.

use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::models::{EventRow, LinkedVenueRow};
use crate::domain::date_filter::RangeEnd;
use crate::domain::{Event, EventId, EventQuery, UserId, ValidatedEvent, Venue, VenueId};
use crate::error::AppError;

const EVENT_COLUMNS: &str = "id, name, sport, starts_at, description, location, created_at";

/// Builds the filtered, ordered `SELECT` behind [`EventStore::list_events`].
///
/// Binds in order: user id, one search pattern per searchable field, the
/// venue-matched event ids, sport, range start, range end.
fn list_query(user: UserId, query: &EventQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb: QueryBuilder<'static, Postgres> =
        QueryBuilder::new(format!("SELECT {EVENT_COLUMNS} FROM events WHERE user_id = "));
    qb.push_bind(user);

    if let Some(search) = &query.search {
        tracing::debug!(filter = %search.or_expression(), "applying search filter");
        let pattern = search.pattern();
        qb.push(" AND (");
        for (i, field) in crate::domain::search::SEARCH_FIELDS.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push(*field)
                .push(" ILIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\'");
        }
        if !search.venue_event_ids().is_empty() {
            let ids: Vec<Uuid> = search.venue_event_ids().iter().map(|id| *id.as_uuid()).collect();
            qb.push(" OR id = ANY(").push_bind(ids).push(")");
        }
        qb.push(")");
    }

    if let Some(sport) = &query.sport {
        qb.push(" AND sport = ").push_bind(sport.clone());
    }

    if let Some(start) = query.range.start {
        qb.push(" AND starts_at >= ").push_bind(start);
    }
    match query.range.end {
        Some(RangeEnd::Inclusive(end)) => {
            qb.push(" AND starts_at <= ").push_bind(end);
        }
        Some(RangeEnd::Exclusive(end)) => {
            qb.push(" AND starts_at < ").push_bind(end);
        }
        None => {}
    }

    qb.push(" ORDER BY ")
        .push(query.sort.column())
        .push(if query.sort.ascending { " ASC" } else { " DESC" })
        .push(", id ASC");
    qb
}

/// PostgreSQL-backed event store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct EventStore {
    pool: PgPool,
}

impl EventStore {
    /// Creates a store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists a user's events matching `query`, with their venues.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database failure.
    pub async fn list_events(&self, user: UserId, query: &EventQuery) -> Result<Vec<Event>, AppError> {
        let mut qb = list_query(user, query);
        let rows: Vec<EventRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::persistence("Failed to fetch events", e))?;

        let ids: Vec<EventId> = rows.iter().map(|r| r.id).collect();
        let mut venues = self.venues_for_events(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let linked = venues.remove(&row.id).unwrap_or_default();
                row.into_event(linked)
            })
            .collect())
    }

    /// Finds events linked to a venue whose name matches `pattern`.
    ///
    /// Two lookups, one hop: venue ids by name, then event ids by link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database failure.
    pub async fn event_ids_by_venue_name(&self, pattern: &str) -> Result<Vec<EventId>, AppError> {
        let ctx = "Failed to search venues";
        let venue_ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT id FROM venues WHERE name ILIKE $1 ESCAPE '\\'")
                .bind(pattern)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| AppError::persistence(ctx, e))?;

        if venue_ids.is_empty() {
            return Ok(Vec::new());
        }

        let event_ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT DISTINCT event_id FROM event_venues WHERE venue_id = ANY($1)",
        )
        .bind(venue_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::persistence(ctx, e))?;

        Ok(event_ids.into_iter().map(EventId::from_uuid).collect())
    }

    /// Loads the venues of each given event, keyed by event id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database failure.
    pub async fn venues_for_events(
        &self,
        event_ids: &[EventId],
    ) -> Result<HashMap<EventId, Vec<Venue>>, AppError> {
        if event_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let ids: Vec<Uuid> = event_ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<LinkedVenueRow> = sqlx::query_as(
            "SELECT ev.event_id, v.id AS venue_id, v.name AS venue_name \
             FROM event_venues ev JOIN venues v ON v.id = ev.venue_id \
             WHERE ev.event_id = ANY($1) ORDER BY v.name ASC",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::persistence("Failed to fetch venues", e))?;

        let mut by_event: HashMap<EventId, Vec<Venue>> = HashMap::with_capacity(event_ids.len());
        for row in rows {
            by_event.entry(row.event_id).or_default().push(Venue {
                id: row.venue_id,
                name: row.venue_name,
            });
        }
        Ok(by_event)
    }

    /// Fetches one of the user's events with its venues.
    ///
    /// Returns `None` if the event does not exist or belongs to another user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database failure.
    pub async fn get_event(&self, user: UserId, id: EventId) -> Result<Option<Event>, AppError> {
        let row: Option<EventRow> = sqlx::query_as(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::persistence("Failed to fetch event", e))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut venues = self.venues_for_events(&[id]).await?;
        Ok(Some(row.into_event(venues.remove(&id).unwrap_or_default())))
    }

    /// Returns `true` if `user` owns the event.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database failure.
    pub async fn owns_event(&self, user: UserId, id: EventId) -> Result<bool, AppError> {
        let found: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM events WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::persistence("Failed to verify event ownership", e))?;
        Ok(found.is_some())
    }

    /// Inserts an event row owned by `user`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database failure.
    pub async fn insert_event(
        &self,
        user: UserId,
        id: EventId,
        event: &ValidatedEvent,
    ) -> Result<EventRow, AppError> {
        sqlx::query_as(&format!(
            "INSERT INTO events (id, user_id, name, sport, starts_at, description, location) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {EVENT_COLUMNS}"
        ))
        .bind(id)
        .bind(user)
        .bind(&event.name)
        .bind(&event.sport)
        .bind(event.starts_at)
        .bind(&event.description)
        .bind(&event.location)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::persistence("Failed to create event", e))
    }

    /// Overwrites the scalar fields of an event.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database failure.
    pub async fn update_event(&self, id: EventId, event: &ValidatedEvent) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE events SET name = $2, sport = $3, starts_at = $4, description = $5, \
             location = $6 WHERE id = $1",
        )
        .bind(id)
        .bind(&event.name)
        .bind(&event.sport)
        .bind(event.starts_at)
        .bind(&event.description)
        .bind(&event.location)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::persistence("Failed to update event", e))?;
        Ok(())
    }

    /// Deletes an event row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database failure.
    pub async fn delete_event(&self, id: EventId) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::persistence("Failed to delete event", e))?;
        Ok(result.rows_affected())
    }

    /// Returns the id of the venue with exactly this name, creating it if
    /// none exists. Lookup ignores ownership; venues are global.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database failure.
    pub async fn find_or_create_venue(&self, name: &str) -> Result<Venue, AppError> {
        let ctx = "Failed to resolve venue";
        let existing: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM venues WHERE name = $1 ORDER BY created_at ASC LIMIT 1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::persistence(ctx, e))?;

        let id = match existing {
            Some(id) => VenueId::from_uuid(id),
            None => {
                let id = VenueId::new();
                sqlx::query("INSERT INTO venues (id, name) VALUES ($1, $2)")
                    .bind(id)
                    .bind(name)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| AppError::persistence(ctx, e))?;
                tracing::debug!(venue_id = %id, "venue created");
                id
            }
        };

        Ok(Venue {
            id,
            name: name.to_string(),
        })
    }

    /// Links each venue to the event.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database failure.
    pub async fn link_venues(&self, event_id: EventId, venues: &[VenueId]) -> Result<(), AppError> {
        if venues.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = venues.iter().map(|id| *id.as_uuid()).collect();
        sqlx::query(
            "INSERT INTO event_venues (event_id, venue_id) SELECT $1, UNNEST($2::uuid[])",
        )
        .bind(event_id)
        .bind(ids)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::persistence("Failed to link venues", e))?;
        Ok(())
    }

    /// Removes every venue link of the event.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database failure.
    pub async fn unlink_venues(&self, event_id: EventId) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM event_venues WHERE event_id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::persistence("Failed to unlink venues", e))?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;
    use crate::domain::SearchFilter;

    fn now() -> DateTime<Utc> {
        let Some(now) = Utc.with_ymd_and_hms(2024, 12, 30, 10, 0, 0).single() else {
            panic!("invalid test timestamp");
        };
        now
    }

    fn sql_for(search: Option<&str>, sport: Option<&str>, date: Option<&str>, sort: Option<&str>) -> String {
        let query = EventQuery::from_params(search, sport, date, sort, now());
        list_query(UserId::new(), &query).sql().to_string()
    }

    #[test]
    fn unfiltered_list_is_scoped_and_ordered_by_start() {
        let sql = sql_for(None, None, None, None);
        assert_eq!(
            sql,
            format!("SELECT {EVENT_COLUMNS} FROM events WHERE user_id = $1 ORDER BY starts_at ASC, id ASC")
        );
    }

    #[test]
    fn search_matches_every_field_with_escaped_pattern() {
        let sql = sql_for(Some("park"), None, None, None);
        assert!(sql.contains(
            "AND (name ILIKE $2 ESCAPE '\\' OR sport ILIKE $3 ESCAPE '\\' \
             OR description ILIKE $4 ESCAPE '\\' OR location ILIKE $5 ESCAPE '\\')"
        ));
        assert!(!sql.contains("ANY("));
    }

    #[test]
    fn venue_matches_are_folded_into_the_search() {
        let Some(search) = SearchFilter::new("court") else {
            panic!("non-empty term should build a filter");
        };
        let query = EventQuery {
            search: Some(search.with_venue_matches(vec![EventId::new()])),
            ..EventQuery::default()
        };
        let qb = list_query(UserId::new(), &query);
        assert!(qb.sql().contains("location ILIKE $5 ESCAPE '\\' OR id = ANY($6))"));
    }

    #[test]
    fn sport_follows_the_search_binds() {
        let sql = sql_for(Some("park"), Some("Tennis"), None, None);
        assert!(sql.contains(" AND sport = $6"));
    }

    #[test]
    fn past_range_is_half_open() {
        let sql = sql_for(None, None, Some("past"), None);
        assert!(sql.contains(" AND starts_at < $2"));
        assert!(!sql.contains("<="));
        assert!(!sql.contains(">="));
    }

    #[test]
    fn upcoming_range_has_no_upper_bound() {
        let sql = sql_for(None, None, Some("upcoming"), None);
        assert!(sql.contains(" AND starts_at >= $2"));
        assert!(!sql.contains("starts_at <"));
    }

    #[test]
    fn today_range_is_inclusive_at_both_ends() {
        let sql = sql_for(None, Some("Basketball"), Some("today"), None);
        assert!(sql.contains(" AND sport = $2 AND starts_at >= $3 AND starts_at <= $4"));
    }

    #[test]
    fn sort_option_picks_column_and_direction() {
        let sql = sql_for(None, None, None, Some("name-desc"));
        assert!(sql.ends_with(" ORDER BY name DESC, id ASC"));
        let sql = sql_for(None, None, None, Some("date-asc"));
        assert!(sql.ends_with(" ORDER BY starts_at ASC, id ASC"));
    }
}
