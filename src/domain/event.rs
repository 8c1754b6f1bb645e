//! Events, venues and the validated event submission.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{EventId, VenueId};

/// Suggested sport vocabulary. Not enforced by the store.
pub const SPORTS: [&str; 9] = [
    "Basketball",
    "Football",
    "Soccer",
    "Baseball",
    "Tennis",
    "Volleyball",
    "Hockey",
    "Pickleball",
    "Other",
];

/// Venue substituted when an assistant-extracted event names none.
pub const DEFAULT_VENUE_NAME: &str = "Main Venue";

const MAX_NAME_CHARS: usize = 200;
const MAX_SPORT_CHARS: usize = 100;
const MAX_DESCRIPTION_CHARS: usize = 1000;
const MAX_LOCATION_CHARS: usize = 200;

/// A named venue, shared by every user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Venue {
    /// Venue identifier.
    #[schema(value_type = uuid::Uuid)]
    pub id: VenueId,
    /// Venue name, unique by exact match.
    pub name: String,
}

/// A stored event together with its linked venues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event identifier.
    pub id: EventId,
    /// Event name.
    pub name: String,
    /// Sport type.
    pub sport: String,
    /// Start instant.
    pub starts_at: DateTime<Utc>,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Optional location.
    pub location: Option<String>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Linked venues, at least one for events created through validation.
    pub venues: Vec<Venue>,
}

/// Raw event submission as it arrives from a form or the assistant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventSubmission {
    /// Event name (1–200 chars).
    #[serde(default)]
    pub name: String,
    /// Sport type (1–100 chars).
    #[serde(default)]
    pub sport: String,
    /// Start time, RFC 3339 or `YYYY-MM-DDTHH:mm[:ss]` (read as UTC).
    #[serde(default)]
    pub date_time: String,
    /// Optional description (≤1000 chars).
    #[serde(default)]
    pub description: Option<String>,
    /// Optional location (≤200 chars).
    #[serde(default)]
    pub location: Option<String>,
    /// Venue names; at least one, none empty.
    #[serde(default)]
    pub venue_names: Vec<String>,
}

/// A submission that passed validation and is ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEvent {
    /// Event name.
    pub name: String,
    /// Sport type.
    pub sport: String,
    /// Start instant, normalized to UTC.
    pub starts_at: DateTime<Utc>,
    /// Description, `None` when absent or empty.
    pub description: Option<String>,
    /// Location, `None` when absent or empty.
    pub location: Option<String>,
    /// Venue names in submission order, duplicates removed.
    pub venue_names: Vec<String>,
}

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    /// Field name in the submission's wire casing.
    pub field: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl EventSubmission {
    /// Checks every field and collects all failures.
    ///
    /// # Errors
    ///
    /// Returns the list of [`FieldError`]s when any field is invalid.
    pub fn validate(&self) -> Result<ValidatedEvent, Vec<FieldError>> {
        let mut errors = Vec::new();

        check_length(&mut errors, "name", &self.name, MAX_NAME_CHARS, "Event name is required");
        check_length(&mut errors, "sport", &self.sport, MAX_SPORT_CHARS, "Sport type is required");

        let starts_at = parse_start(&self.date_time);
        if starts_at.is_none() {
            errors.push(FieldError::new("dateTime", "Invalid date format"));
        }

        let description = non_empty(self.description.as_deref());
        if let Some(d) = description.as_deref() {
            check_max(&mut errors, "description", d, MAX_DESCRIPTION_CHARS);
        }
        let location = non_empty(self.location.as_deref());
        if let Some(l) = location.as_deref() {
            check_max(&mut errors, "location", l, MAX_LOCATION_CHARS);
        }

        if self.venue_names.is_empty() {
            errors.push(FieldError::new("venueNames", "At least one venue is required"));
        }
        if self.venue_names.iter().any(String::is_empty) {
            errors.push(FieldError::new("venueNames", "Venue name cannot be empty"));
        }

        match starts_at {
            Some(starts_at) if errors.is_empty() => {
                let mut venue_names: Vec<String> = Vec::with_capacity(self.venue_names.len());
                for name in &self.venue_names {
                    if !venue_names.contains(name) {
                        venue_names.push(name.clone());
                    }
                }
                Ok(ValidatedEvent {
                    name: self.name.clone(),
                    sport: self.sport.clone(),
                    starts_at,
                    description,
                    location,
                    venue_names,
                })
            }
            _ => Err(errors),
        }
    }
}

fn check_length(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: &str,
    max: usize,
    required: &str,
) {
    if value.is_empty() {
        errors.push(FieldError::new(field, required));
    } else {
        check_max(errors, field, value, max);
    }
}

fn check_max(errors: &mut Vec<FieldError>, field: &'static str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.push(FieldError::new(
            field,
            format!("must be at most {max} characters"),
        ));
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Parses a submitted start time into UTC.
///
/// Accepts RFC 3339 with any offset, or the offset-less
/// `YYYY-MM-DDTHH:mm[:ss]` form produced by datetime inputs, which is read
/// as UTC.
#[must_use]
pub fn parse_start(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Column an event list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Start instant.
    Date,
    /// Event name.
    Name,
}

/// Ordering of the event list, parsed from `<field>-<direction>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOption {
    /// Ordered column.
    pub field: SortField,
    /// `true` for ascending order.
    pub ascending: bool,
}

impl Default for SortOption {
    fn default() -> Self {
        Self {
            field: SortField::Date,
            ascending: true,
        }
    }
}

impl SortOption {
    /// Parses `date-asc`, `name-desc` and so on. Missing input or an unknown
    /// field yields ascending order by date.
    #[must_use]
    pub fn from_param(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        let (field, direction) = raw.split_once('-').unwrap_or((raw, ""));
        let ascending = direction == "asc";
        match field {
            "date" => Self {
                field: SortField::Date,
                ascending,
            },
            "name" => Self {
                field: SortField::Name,
                ascending,
            },
            _ => Self::default(),
        }
    }

    /// SQL column backing the sort field.
    #[must_use]
    pub const fn column(&self) -> &'static str {
        match self.field {
            SortField::Date => "starts_at",
            SortField::Name => "name",
        }
    }
}
