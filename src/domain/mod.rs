//! Domain layer: identifiers, events, search and date filtering, and the
//! assistant's conversation types.
//!
//! Everything here is pure. Functions that depend on the current time take
//! `now` as an argument instead of reading the clock.

pub mod assistant;
pub mod date_filter;
pub mod event;
pub mod ids;
pub mod query;
pub mod search;

pub use assistant::{ChatMessage, ChatRole, ExtractedEventData, ReferenceDates};
pub use date_filter::{DateFilter, DateRange, RangeEnd};
pub use event::{Event, EventSubmission, FieldError, SortOption, ValidatedEvent, Venue};
pub use ids::{EventId, UserId, VenueId};
pub use query::EventQuery;
pub use search::{SearchFilter, sanitize};
