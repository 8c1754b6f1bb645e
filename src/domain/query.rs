//! Fully-resolved parameters of an event list request.

use chrono::{DateTime, Utc};

use super::{DateFilter, DateRange, SearchFilter, SortOption};

/// Everything the store needs to list a user's events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    /// Sanitized free-text search, if any.
    pub search: Option<SearchFilter>,
    /// Exact sport to match, if any.
    pub sport: Option<String>,
    /// Start-time bounds.
    pub range: DateRange,
    /// Result ordering.
    pub sort: SortOption,
}

impl EventQuery {
    /// Resolves raw request parameters against `now`. Empty strings count as
    /// absent.
    #[must_use]
    pub fn from_params(
        search: Option<&str>,
        sport: Option<&str>,
        date: Option<&str>,
        sort: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            search: search.and_then(SearchFilter::new),
            sport: sport.filter(|s| !s.is_empty()).map(str::to_string),
            range: DateFilter::from_param(date).resolve(now),
            sort: SortOption::from_param(sort),
        }
    }
}
