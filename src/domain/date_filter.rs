//! Named date buckets resolved into concrete UTC ranges.
//!
//! A [`DateFilter`] is a request parameter, not a stored value. It is
//! resolved against an explicit `now` so that every boundary can be tested
//! without touching the system clock. All boundaries are computed on UTC
//! calendar fields; no local or user timezone is ever consulted.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Symbolic date filter accepted by the event list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DateFilter {
    /// No date restriction.
    #[default]
    All,
    /// The current UTC calendar day.
    Today,
    /// Sunday through Saturday of the current UTC week.
    Week,
    /// The current UTC calendar month.
    Month,
    /// Everything starting at or after `now`.
    Upcoming,
    /// Everything starting strictly before `now`.
    Past,
}

/// Upper bound of a [`DateRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEnd {
    /// Matches instants `<=` the bound.
    Inclusive(DateTime<Utc>),
    /// Matches instants `<` the bound.
    Exclusive(DateTime<Utc>),
}

/// Resolved range. Absent bounds are unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    /// Inclusive lower bound.
    pub start: Option<DateTime<Utc>>,
    /// Upper bound.
    pub end: Option<RangeEnd>,
}

impl DateRange {
    fn closed(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(RangeEnd::Inclusive(end)),
        }
    }
}

impl DateFilter {
    /// Every filter, in the order they are offered to clients.
    pub const ALL: [Self; 6] = [
        Self::All,
        Self::Today,
        Self::Week,
        Self::Month,
        Self::Upcoming,
        Self::Past,
    ];

    /// Returns the wire name of the filter.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::Upcoming => "upcoming",
            Self::Past => "past",
        }
    }

    /// Parses an optional query parameter. Missing or unknown names mean
    /// [`DateFilter::All`].
    #[must_use]
    pub fn from_param(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }

    /// Resolves the filter into a concrete range relative to `now`.
    #[must_use]
    pub fn resolve(&self, now: DateTime<Utc>) -> DateRange {
        let today = now.date_naive();
        match self {
            Self::All => DateRange::default(),
            Self::Today => DateRange::closed(start_of_day(today), end_of_day(today)),
            Self::Week => {
                let back = u64::from(today.weekday().num_days_from_sunday());
                let sunday = today - Days::new(back);
                let saturday = sunday + Days::new(6);
                DateRange::closed(start_of_day(sunday), end_of_day(saturday))
            }
            Self::Month => {
                let first = today - Days::new(u64::from(today.day0()));
                // Day zero of the following month.
                let last = first + Months::new(1) - Days::new(1);
                DateRange::closed(start_of_day(first), end_of_day(last))
            }
            Self::Upcoming => DateRange {
                start: Some(now),
                end: None,
            },
            Self::Past => DateRange {
                start: None,
                end: Some(RangeEnd::Exclusive(now)),
            },
        }
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a filter name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown date filter: {0}")]
pub struct UnknownDateFilter(pub String);

impl FromStr for DateFilter {
    type Err = UnknownDateFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownDateFilter(s.to_string()))
    }
}

/// 00:00:00.000 UTC on `date`.
#[must_use]
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// 23:59:59.999 UTC on `date`.
#[must_use]
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + TimeDelta::days(1) - TimeDelta::milliseconds(1)
}
