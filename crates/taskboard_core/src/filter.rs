//! Date filter engine.
//!
//! # Responsibility
//! - Classify creation timestamps as today / this week / inside a custom range.
//! - Derive the filtered task view for a given filter state.
//!
//! # Invariants
//! - Every function is pure; "now" and the calendar time zone are inputs.
//! - Day, week and range bounds are whole-day inclusive in local time.
//! - Filtering preserves source order and never mutates its input.
//! - `Custom(None)` matches nothing.

use crate::model::Task;
use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Weekday};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// First day of the calendar week used by the this-week filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            Self::Sunday => Weekday::Sun,
            Self::Monday => Weekday::Mon,
        }
    }
}

/// Inclusive calendar-day range for the custom filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Rejected custom range input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidRangeError {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Display for InvalidRangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "range start ({}) must not be after range end ({})",
            self.start, self.end
        )
    }
}

impl Error for InvalidRangeError {}

impl DateRange {
    /// Builds a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidRangeError> {
        let range = Self { start, end };
        if range.is_valid() {
            Ok(range)
        } else {
            Err(InvalidRangeError { start, end })
        }
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", format_date(self.start), format_date(self.end))
    }
}

/// Active date filter state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFilter {
    #[default]
    All,
    Today,
    ThisWeek,
    /// `None` is a custom filter whose range has not been supplied yet.
    Custom(Option<DateRange>),
}

impl DateFilter {
    /// Human-readable label for the active filter.
    pub fn label(&self) -> String {
        match self {
            Self::All => "All Tasks".to_string(),
            Self::Today => "Today".to_string(),
            Self::ThisWeek => "This Week".to_string(),
            Self::Custom(Some(range)) => range.to_string(),
            Self::Custom(None) => "Custom Range".to_string(),
        }
    }
}

/// Formats a calendar date as `Jan 15, 2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Returns `true` when `timestamp_ms` falls on the same local calendar day as `now`.
pub fn is_today<Tz: TimeZone>(timestamp_ms: i64, now: &DateTime<Tz>) -> bool {
    local_date(timestamp_ms, &now.timezone()) == Some(now.date_naive())
}

/// Returns `true` when `timestamp_ms` falls inside the local calendar week containing `now`.
pub fn is_this_week<Tz: TimeZone>(
    timestamp_ms: i64,
    now: &DateTime<Tz>,
    week_start: WeekStart,
) -> bool {
    let Some(week) = week_bounds(now.date_naive(), week_start) else {
        return false;
    };
    match local_date(timestamp_ms, &now.timezone()) {
        Some(date) => week.contains(date),
        None => false,
    }
}

/// Returns `true` when `timestamp_ms` falls on or between the range's calendar days.
pub fn is_in_range<Tz: TimeZone>(timestamp_ms: i64, range: &DateRange, tz: &Tz) -> bool {
    local_date(timestamp_ms, tz).is_some_and(|date| range.contains(date))
}

/// Returns the first and last calendar day of the week containing `day`.
pub fn week_bounds(day: NaiveDate, week_start: WeekStart) -> Option<DateRange> {
    let weekday = day.weekday().num_days_from_monday();
    let first = week_start.weekday().num_days_from_monday();
    let offset = (7 + weekday - first) % 7;
    let start = day.checked_sub_days(Days::new(u64::from(offset)))?;
    let end = start.checked_add_days(Days::new(6))?;
    Some(DateRange { start, end })
}

/// Applies `filter` to `tasks` by creation timestamp, keeping source order.
pub fn filter_tasks<Tz: TimeZone>(
    tasks: &[Task],
    filter: &DateFilter,
    now: &DateTime<Tz>,
    week_start: WeekStart,
) -> Vec<Task> {
    match filter {
        DateFilter::All => tasks.to_vec(),
        DateFilter::Custom(None) => Vec::new(),
        _ => tasks
            .iter()
            .filter(|task| matches_filter(task.created_at, filter, now, week_start))
            .cloned()
            .collect(),
    }
}

/// Single-timestamp form of [`filter_tasks`].
pub fn matches_filter<Tz: TimeZone>(
    timestamp_ms: i64,
    filter: &DateFilter,
    now: &DateTime<Tz>,
    week_start: WeekStart,
) -> bool {
    match filter {
        DateFilter::All => true,
        DateFilter::Today => is_today(timestamp_ms, now),
        DateFilter::ThisWeek => is_this_week(timestamp_ms, now, week_start),
        DateFilter::Custom(Some(range)) => is_in_range(timestamp_ms, range, &now.timezone()),
        DateFilter::Custom(None) => false,
    }
}

fn local_date<Tz: TimeZone>(timestamp_ms: i64, tz: &Tz) -> Option<NaiveDate> {
    tz.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|datetime| datetime.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn ms(rfc3339: &str) -> i64 {
        DateTime::parse_from_rfc3339(rfc3339)
            .expect("valid rfc3339 fixture")
            .timestamp_millis()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date fixture")
    }

    fn monday_morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
    }

    #[test]
    fn today_matches_same_calendar_day_only() {
        let now = monday_morning();
        assert!(is_today(ms("2024-01-15T15:30:00Z"), &now));
        assert!(is_today(ms("2024-01-15T00:00:00.000Z"), &now));
        assert!(is_today(ms("2024-01-15T23:59:59.999Z"), &now));
        assert!(!is_today(ms("2024-01-14T23:59:59.999Z"), &now));
        assert!(!is_today(ms("2024-01-16T00:00:00.000Z"), &now));
    }

    #[test]
    fn today_uses_the_clock_time_zone() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let now = tokyo.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();
        // 2024-01-14T20:00Z is 2024-01-15T05:00 in UTC+9.
        assert!(is_today(ms("2024-01-14T20:00:00Z"), &now));
        assert!(!is_today(ms("2024-01-14T14:59:59Z"), &now));
    }

    #[test]
    fn this_week_runs_sunday_through_saturday_inclusive() {
        let now = monday_morning();
        let sunday = WeekStart::Sunday;
        assert!(is_this_week(ms("2024-01-14T00:00:00.000Z"), &now, sunday));
        assert!(is_this_week(ms("2024-01-19T10:00:00Z"), &now, sunday));
        assert!(is_this_week(ms("2024-01-20T23:59:59.999Z"), &now, sunday));
        assert!(!is_this_week(ms("2024-01-13T23:59:59.999Z"), &now, sunday));
        assert!(!is_this_week(ms("2024-01-21T00:00:00.000Z"), &now, sunday));
        assert!(!is_this_week(ms("2024-01-08T10:00:00Z"), &now, sunday));
        assert!(!is_this_week(ms("2024-01-22T10:00:00Z"), &now, sunday));
    }

    #[test]
    fn monday_week_start_shifts_the_window() {
        let now = monday_morning();
        assert!(!is_this_week(ms("2024-01-14T12:00:00Z"), &now, WeekStart::Monday));
        assert!(is_this_week(ms("2024-01-21T12:00:00Z"), &now, WeekStart::Monday));
    }

    #[test]
    fn week_bounds_on_week_start_day_begins_that_day() {
        let sunday = date(2024, 1, 14);
        let week = week_bounds(sunday, WeekStart::Sunday).unwrap();
        assert_eq!(week.start, sunday);
        assert_eq!(week.end, date(2024, 1, 20));

        let week = week_bounds(sunday, WeekStart::Monday).unwrap();
        assert_eq!(week.start, date(2024, 1, 8));
        assert_eq!(week.end, sunday);
    }

    #[test]
    fn range_bounds_are_whole_day_inclusive() {
        let range = DateRange::new(date(2024, 1, 10), date(2024, 1, 20)).unwrap();
        assert!(is_in_range(ms("2024-01-10T00:00:00.000Z"), &range, &Utc));
        assert!(is_in_range(ms("2024-01-15T00:00:00Z"), &range, &Utc));
        assert!(is_in_range(ms("2024-01-20T23:59:59.999Z"), &range, &Utc));
        assert!(!is_in_range(ms("2024-01-09T23:59:59.999Z"), &range, &Utc));
        assert!(!is_in_range(ms("2024-01-05T00:00:00Z"), &range, &Utc));
        assert!(!is_in_range(ms("2024-01-25T00:00:00Z"), &range, &Utc));
    }

    #[test]
    fn range_rejects_start_after_end() {
        let err = DateRange::new(date(2024, 1, 20), date(2024, 1, 10)).unwrap_err();
        assert_eq!(err.start, date(2024, 1, 20));
        assert!(DateRange::new(date(2024, 1, 10), date(2024, 1, 10)).is_ok());
    }

    #[test]
    fn labels_match_filter_state() {
        let range = DateRange::new(date(2024, 1, 10), date(2024, 1, 20)).unwrap();
        assert_eq!(DateFilter::All.label(), "All Tasks");
        assert_eq!(DateFilter::ThisWeek.label(), "This Week");
        assert_eq!(DateFilter::Custom(None).label(), "Custom Range");
        assert_eq!(
            DateFilter::Custom(Some(range)).label(),
            "Jan 10, 2024 - Jan 20, 2024"
        );
        assert_eq!(format_date(date(2024, 1, 5)), "Jan 5, 2024");
    }

    #[test]
    fn out_of_range_timestamp_matches_only_all() {
        let now = monday_morning();
        assert!(matches_filter(i64::MAX, &DateFilter::All, &now, WeekStart::Sunday));
        assert!(!matches_filter(i64::MAX, &DateFilter::Today, &now, WeekStart::Sunday));
    }
}
