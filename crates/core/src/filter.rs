//! Dashboard filter state.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use crate::mission::Mission;

/// Error parsing a filter value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} filter: {value}")]
pub struct ParseFilterError {
    kind: &'static str,
    value: String,
}

/// Filter on mission completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// No status filtering
    #[default]
    All,
    /// Only missions with a report
    Completed,
    /// Only missions without a report
    InProgress,
}

impl StatusFilter {
    /// Whether the mission passes this filter.
    pub fn matches(&self, mission: &Mission) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => mission.is_completed(),
            StatusFilter::InProgress => !mission.is_completed(),
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "all" => Ok(StatusFilter::All),
            "completed" | "done" => Ok(StatusFilter::Completed),
            "in_progress" | "active" => Ok(StatusFilter::InProgress),
            _ => Err(ParseFilterError { kind: "status", value: s.to_string() }),
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Completed => write!(f, "completed"),
            StatusFilter::InProgress => write!(f, "in_progress"),
        }
    }
}

/// Filter on mission creation date, relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodFilter {
    /// No date filtering
    #[default]
    All,
    /// Same calendar day
    Today,
    /// Sunday through Saturday of the current week
    ThisWeek,
    /// Same month and year
    ThisMonth,
    /// Same year
    ThisYear,
    /// The current day and the 15 days before it
    #[serde(rename = "last_15_days")]
    Last15Days,
}

impl PeriodFilter {
    /// Whether `at` falls inside the window anchored at `now`.
    ///
    /// Calendar boundaries are evaluated in the time zone of `now`.
    pub fn contains<Tz: TimeZone>(&self, at: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
        let today = now.date_naive();
        let date = at.with_timezone(&now.timezone()).date_naive();

        match self {
            PeriodFilter::All => true,
            PeriodFilter::Today => date == today,
            PeriodFilter::ThisWeek => {
                let offset = u64::from(today.weekday().num_days_from_sunday());
                let start = days_before(today, offset);
                let end = start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
                date >= start && date <= end
            }
            PeriodFilter::ThisMonth => date.year() == today.year() && date.month() == today.month(),
            PeriodFilter::ThisYear => date.year() == today.year(),
            PeriodFilter::Last15Days => date >= days_before(today, 15) && date <= today,
        }
    }
}

fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

impl std::str::FromStr for PeriodFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "all" => Ok(PeriodFilter::All),
            "today" => Ok(PeriodFilter::Today),
            "this_week" | "week" => Ok(PeriodFilter::ThisWeek),
            "this_month" | "month" => Ok(PeriodFilter::ThisMonth),
            "this_year" | "year" => Ok(PeriodFilter::ThisYear),
            "last_15_days" => Ok(PeriodFilter::Last15Days),
            _ => Err(ParseFilterError { kind: "period", value: s.to_string() }),
        }
    }
}

impl std::fmt::Display for PeriodFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeriodFilter::All => write!(f, "all"),
            PeriodFilter::Today => write!(f, "today"),
            PeriodFilter::ThisWeek => write!(f, "this_week"),
            PeriodFilter::ThisMonth => write!(f, "this_month"),
            PeriodFilter::ThisYear => write!(f, "this_year"),
            PeriodFilter::Last15Days => write!(f, "last_15_days"),
        }
    }
}

/// Search, status and period filters applied to the mission list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Case-insensitive substring of the mission name
    pub search: String,

    /// Completion filter
    pub status: StatusFilter,

    /// Creation date filter
    pub period: PeriodFilter,
}

impl FilterState {
    /// True when no predicate is active.
    pub fn is_unfiltered(&self) -> bool {
        self.search.is_empty()
            && self.status == StatusFilter::All
            && self.period == PeriodFilter::All
    }

    /// Build a matcher with the search term lowered once.
    pub fn matcher<'a, Tz: TimeZone>(&'a self, now: &'a DateTime<Tz>) -> impl Fn(&Mission) -> bool + 'a {
        let needle = self.search.to_lowercase();
        move |mission: &Mission| {
            (needle.is_empty() || mission.name.to_lowercase().contains(&needle))
                && self.status.matches(mission)
                && (self.period == PeriodFilter::All || self.period.contains(&mission.created_at, now))
        }
    }

    /// Whether a single mission passes every active predicate.
    pub fn matches<Tz: TimeZone>(&self, mission: &Mission, now: &DateTime<Tz>) -> bool {
        (self.matcher(now))(mission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_today_and_week() {
        // Wednesday
        let now = utc(2025, 10, 15, 12);

        assert!(PeriodFilter::Today.contains(&utc(2025, 10, 15, 0), &now));
        assert!(!PeriodFilter::Today.contains(&utc(2025, 10, 14, 23), &now));

        // Sunday 12th through Saturday 18th
        assert!(PeriodFilter::ThisWeek.contains(&utc(2025, 10, 12, 0), &now));
        assert!(PeriodFilter::ThisWeek.contains(&utc(2025, 10, 18, 23), &now));
        assert!(!PeriodFilter::ThisWeek.contains(&utc(2025, 10, 11, 23), &now));
        assert!(!PeriodFilter::ThisWeek.contains(&utc(2025, 10, 19, 0), &now));
    }

    #[test]
    fn test_week_starts_on_sunday() {
        let sunday = utc(2025, 10, 12, 8);
        assert!(PeriodFilter::ThisWeek.contains(&utc(2025, 10, 12, 1), &sunday));
        assert!(!PeriodFilter::ThisWeek.contains(&utc(2025, 10, 11, 1), &sunday));
    }

    #[test]
    fn test_month_year_and_last_15_days() {
        let now = utc(2025, 10, 15, 12);

        assert!(PeriodFilter::ThisMonth.contains(&utc(2025, 10, 1, 0), &now));
        assert!(!PeriodFilter::ThisMonth.contains(&utc(2024, 10, 1, 0), &now));
        assert!(PeriodFilter::ThisYear.contains(&utc(2025, 1, 1, 0), &now));
        assert!(!PeriodFilter::ThisYear.contains(&utc(2024, 12, 31, 23), &now));

        assert!(PeriodFilter::Last15Days.contains(&utc(2025, 9, 30, 0), &now));
        assert!(PeriodFilter::Last15Days.contains(&utc(2025, 10, 15, 23), &now));
        assert!(!PeriodFilter::Last15Days.contains(&utc(2025, 9, 29, 23), &now));
        assert!(!PeriodFilter::Last15Days.contains(&utc(2025, 10, 16, 0), &now));
    }

    #[test]
    fn test_boundaries_follow_now_time_zone() {
        let paris = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = paris.with_ymd_and_hms(2025, 10, 15, 1, 0, 0).unwrap();

        // 23:00 UTC on the 14th is already the 15th in UTC+2.
        assert!(PeriodFilter::Today.contains(&utc(2025, 10, 14, 23), &now));
    }

    #[test]
    fn test_parse_filters() {
        assert_eq!("in-progress".parse::<StatusFilter>().unwrap(), StatusFilter::InProgress);
        assert_eq!("last_15_days".parse::<PeriodFilter>().unwrap(), PeriodFilter::Last15Days);
        assert!("soon".parse::<PeriodFilter>().is_err());
        assert_eq!(PeriodFilter::ThisWeek.to_string(), "this_week");
    }
}
