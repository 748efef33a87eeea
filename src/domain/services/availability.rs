use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::BTreeSet;

const DEFAULT_RANGE_DAYS: i64 = 60;

/// How free dates are suggested. `Default` is the studio's house rule:
/// Monday is the day off, five suggestions, sixty days ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionPolicy {
    pub excluded_weekday: Weekday,
    pub max_suggestions: usize,
    pub lookahead_days: i64,
}

impl Default for SuggestionPolicy {
    fn default() -> Self {
        Self {
            excluded_weekday: Weekday::Mon,
            max_suggestions: 5,
            lookahead_days: 60,
        }
    }
}

impl SuggestionPolicy {
    /// First and last calendar day the suggestion scan can visit.
    pub fn window(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        (today + Duration::days(1), today + Duration::days(self.lookahead_days.max(1)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn default_from(today: NaiveDate) -> Self {
        Self { start: today, end: today + Duration::days(DEFAULT_RANGE_DAYS) }
    }

    /// Builds a range from raw query values. Anything malformed or inverted falls back to defaults.
    pub fn from_query(today: NaiveDate, start: Option<&str>, end: Option<&str>) -> Self {
        let parse = |raw: Option<&str>| raw.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok());

        let start = parse(start).unwrap_or(today);
        let end = parse(end).unwrap_or(start + Duration::days(DEFAULT_RANGE_DAYS));

        if end < start {
            return Self::default_from(today);
        }
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Smallest range covering both.
    pub fn union(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self { start: self.start.min(start), end: self.end.max(end) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityEstimate {
    pub booked_dates: Vec<NaiveDate>,
    pub suggested_dates: Vec<NaiveDate>,
}

pub fn estimate_availability(
    today: NaiveDate,
    range: DateRange,
    booked: &BTreeSet<NaiveDate>,
    policy: &SuggestionPolicy,
) -> AvailabilityEstimate {
    let booked_dates = booked.iter().copied().filter(|d| range.contains(*d)).collect();

    let mut suggested_dates = Vec::with_capacity(policy.max_suggestions);
    let (first, last) = policy.window(today);
    let mut day = first;

    while day <= last && suggested_dates.len() < policy.max_suggestions {
        if day.weekday() != policy.excluded_weekday && !booked.contains(&day) {
            suggested_dates.push(day);
        }
        day += Duration::days(1);
    }

    AvailabilityEstimate { booked_dates, suggested_dates }
}
