//! Conversation turns, the partial event record, and reference dates.
//!
//! None of these are persisted; they live for a single assistant request.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::event::{DEFAULT_VENUE_NAME, EventSubmission};

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The human user.
    User,
    /// The assistant.
    Assistant,
}

impl ChatRole {
    /// Label used when the turn is written into a prompt.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

/// One turn of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    /// Who wrote the turn.
    pub role: ChatRole,
    /// Turn text.
    pub content: String,
}

/// Event fields the assistant managed to extract. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedEventData {
    /// Event name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Sport type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    /// ISO 8601 start time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    /// Location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Venue names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_names: Option<Vec<String>>,
    /// Whether the user described a recurring event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_recurring: Option<bool>,
    /// `daily`, `weekly`, `monthly` or `yearly`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_pattern: Option<String>,
}

/// Reason an extracted record cannot be turned into a submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Missing required fields. Please provide event name, sport, and date/time.")]
pub struct MissingRequiredFields;

impl ExtractedEventData {
    /// Reads whatever fields are usable from a parsed JSON object.
    ///
    /// Each field is read on its own: a missing, `null` or wrongly-typed
    /// field becomes `None` without discarding the others. Non-string
    /// entries inside `venueNames` are skipped.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            name: text("name"),
            sport: text("sport"),
            date_time: text("dateTime"),
            location: text("location"),
            description: text("description"),
            venue_names: value.get("venueNames").and_then(Value::as_array).map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            }),
            is_recurring: value.get("isRecurring").and_then(Value::as_bool),
            recurrence_pattern: text("recurrencePattern"),
        }
    }

    /// Returns `true` if at least one of name, sport or start time is set,
    /// which is when a client should offer confirmation.
    #[must_use]
    pub fn has_event_details(&self) -> bool {
        self.name.is_some() || self.sport.is_some() || self.date_time.is_some()
    }

    /// Converts a confirmed record into a regular submission.
    ///
    /// Falls back to [`DEFAULT_VENUE_NAME`] when no venue was named. Empty
    /// description and location are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`MissingRequiredFields`] unless name, sport and start time
    /// are all present and non-empty.
    pub fn into_submission(self) -> Result<EventSubmission, MissingRequiredFields> {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());
        let (Some(name), Some(sport), Some(date_time)) = (
            present(self.name),
            present(self.sport),
            present(self.date_time),
        ) else {
            return Err(MissingRequiredFields);
        };
        let venue_names = match self.venue_names {
            Some(names) if !names.is_empty() => names,
            _ => vec![DEFAULT_VENUE_NAME.to_string()],
        };
        Ok(EventSubmission {
            name,
            sport,
            date_time,
            description: present(self.description),
            location: present(self.location),
            venue_names,
        })
    }
}

/// Calendar dates injected into the extraction prompt.
///
/// "This weekend" means the current weekend when today is Saturday or
/// Sunday, otherwise the next Saturday and the Sunday after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceDates {
    /// Today's UTC date.
    pub today: NaiveDate,
    /// Today's weekday.
    pub weekday: Weekday,
    /// Today plus one day.
    pub tomorrow: NaiveDate,
    /// Today plus seven days.
    pub next_week: NaiveDate,
    /// Saturday of "this weekend".
    pub weekend_saturday: NaiveDate,
    /// Sunday of "this weekend".
    pub weekend_sunday: NaiveDate,
}

impl ReferenceDates {
    /// Computes the reference dates for the UTC day containing `now`.
    #[must_use]
    pub fn for_instant(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let weekday = today.weekday();
        let (weekend_saturday, weekend_sunday) = match weekday {
            Weekday::Sat => (today, today + Days::new(1)),
            Weekday::Sun => (today - Days::new(1), today),
            other => {
                let ahead = 6 - other.num_days_from_sunday();
                let saturday = today + Days::new(u64::from(ahead));
                (saturday, saturday + Days::new(1))
            }
        };
        Self {
            today,
            weekday,
            tomorrow: today + Days::new(1),
            next_week: today + Days::new(7),
            weekend_saturday,
            weekend_sunday,
        }
    }

    /// Full English weekday name, e.g. `Monday`.
    #[must_use]
    pub fn weekday_name(&self) -> String {
        self.today.format("%A").to_string()
    }
}
