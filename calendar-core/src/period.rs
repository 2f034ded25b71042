//! Calendar periods for bucketed event queries.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime};

use crate::error::{CalendarError, CalendarResult};

/// Format of the `date` query parameter.
pub const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";

/// A calendar bucket around an anchor date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Same year, month and day.
    Day,
    /// Same ISO-8601 week (ISO year and week number).
    Week,
    /// Same year and month.
    Month,
}

impl Period {
    pub fn name(self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
        }
    }

    /// Whether `date`, read in its own offset, falls in the period containing `anchor`.
    pub fn contains(self, anchor: NaiveDate, date: &DateTime<FixedOffset>) -> bool {
        let local = date.date_naive();
        match self {
            Period::Day => local == anchor,
            Period::Week => local.iso_week() == anchor.iso_week(),
            Period::Month => local.year() == anchor.year() && local.month() == anchor.month(),
        }
    }
}

/// Parse a `YYYY-MM-DD` query parameter.
pub fn parse_query_date(s: &str) -> CalendarResult<NaiveDate> {
    NaiveDate::parse_from_str(s, QUERY_DATE_FORMAT)
        .map_err(|_| CalendarError::Validation("invalid date format".into()))
}

/// Parse an event timestamp from a request body.
///
/// Accepts RFC 3339 (`2024-03-04T09:30:00+03:00`). A bare `YYYY-MM-DD`
/// is taken as midnight UTC.
pub fn parse_timestamp(s: &str) -> CalendarResult<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }

    let date = NaiveDate::parse_from_str(s, QUERY_DATE_FORMAT).map_err(|_| {
        CalendarError::Validation(format!(
            "invalid date '{}'. Expected RFC 3339 or YYYY-MM-DD",
            s
        ))
    })?;

    Ok(start_of_day(date))
}

/// Midnight UTC of `date`, for callers that only have a calendar date.
pub fn start_of_day(date: NaiveDate) -> DateTime<FixedOffset> {
    date.and_time(NaiveTime::MIN).and_utc().fixed_offset()
}
