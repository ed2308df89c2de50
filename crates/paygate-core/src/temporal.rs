//! # Temporal Defaults: UTC Date Inputs
//!
//! Computes the default values pre-filled into date inputs when the user
//! has not supplied one. All arithmetic happens in UTC; the caller passes
//! the current instant so results are deterministic under test.
//!
//! ## Formats
//!
//! - Agreement start: ISO-8601 with millisecond precision and `Z` suffix,
//!   e.g. `2026-10-19T12:01:00.000Z`.
//! - Transaction search bounds: calendar dates, `YYYY-MM-DD`.

use chrono::{DateTime, Duration, Months, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;

/// `strftime` pattern for calendar dates sent to the provider.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default billing-agreement start: one minute after `now`.
///
/// The provider rejects start dates in the past, so the lead time covers
/// the gap between rendering the form and submitting it.
pub fn default_agreement_start(now: DateTime<Utc>) -> String {
    (now + Duration::minutes(1)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Inclusive date range for a transaction search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Default transaction-search range: today through today plus one month.
///
/// Month addition clamps to the last day of the target month
/// (January 31 → February 28/29).
pub fn default_search_range(now: DateTime<Utc>) -> DateRange {
    let today = now.date_naive();
    DateRange {
        start: format_date(today),
        end: format_date(add_one_month(today)),
    }
}

/// Render a calendar date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn add_one_month(date: NaiveDate) -> NaiveDate {
    date.checked_add_months(Months::new(1)).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn agreement_start_is_one_minute_ahead() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        assert_eq!(default_agreement_start(now), "2026-10-19T12:01:00.000Z");
    }

    #[test]
    fn agreement_start_rolls_over_midnight() {
        let now = Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 30).unwrap();
        assert_eq!(default_agreement_start(now), "2027-01-01T00:00:30.000Z");
    }

    #[test]
    fn agreement_start_parses_as_rfc3339() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 8, 15, 0).unwrap();
        let start = default_agreement_start(now);
        let parsed = DateTime::parse_from_rfc3339(&start).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), now + Duration::minutes(1));
    }

    #[test]
    fn search_range_spans_one_month() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 23, 30, 0).unwrap();
        let range = default_search_range(now);
        assert_eq!(range.start, "2026-10-19");
        assert_eq!(range.end, "2026-11-19");
    }

    #[test]
    fn search_range_clamps_to_month_end() {
        let now = Utc.with_ymd_and_hms(2026, 1, 31, 0, 0, 0).unwrap();
        let range = default_search_range(now);
        assert_eq!(range.start, "2026-01-31");
        assert_eq!(range.end, "2026-02-28");
    }

    #[test]
    fn search_range_crosses_year_boundary() {
        let now = Utc.with_ymd_and_hms(2026, 12, 5, 0, 0, 0).unwrap();
        let range = default_search_range(now);
        assert_eq!(range.end, "2027-01-05");
    }

    #[test]
    fn search_range_uses_utc_calendar_day() {
        // 23:59 UTC is already the next day in UTC+ zones; the default must not shift.
        let now = Utc.with_ymd_and_hms(2028, 2, 29, 23, 59, 59).unwrap();
        let range = default_search_range(now);
        assert_eq!(range.start, "2028-02-29");
        assert_eq!(range.end, "2028-03-29");
    }
}
