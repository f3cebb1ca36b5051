//! Partial-date resolution for date facets.
//!
//! Accepts `yyyy`, `yyyy-MM` and `yyyy-MM-dd` and turns each into the
//! half-open UTC span it denotes. Anything else, including well-formed but
//! impossible dates like `2040-05-35`, is `Invalid`.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// The span denoted by a partial date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ResolvedDateRange {
    /// `start <= t < end`
    Valid {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// Unparseable or impossible date; matches nothing
    Invalid,
}

impl ResolvedDateRange {
    pub fn is_valid(&self) -> bool {
        matches!(self, ResolvedDateRange::Valid { .. })
    }

    /// Whether `instant` falls inside the span.
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        match self {
            ResolvedDateRange::Valid { start, end } => start <= instant && instant < end,
            ResolvedDateRange::Invalid => false,
        }
    }
}

/// Resolve a partial date token.
pub fn resolve(token: &str) -> ResolvedDateRange {
    match resolve_span(token) {
        Some((start, end)) => ResolvedDateRange::Valid {
            start: midnight(start),
            end: midnight(end),
        },
        None => ResolvedDateRange::Invalid,
    }
}

fn resolve_span(token: &str) -> Option<(NaiveDate, NaiveDate)> {
    let parts: Vec<&str> = token.split('-').collect();
    match parts.as_slice() {
        [year] => {
            let year = number(year, 4)?;
            let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
            let end = NaiveDate::from_ymd_opt(year + 1, 1, 1)?;
            Some((start, end))
        }
        [year, month] => {
            let start = NaiveDate::from_ymd_opt(number(year, 4)?, number(month, 2)? as u32, 1)?;
            Some((start, first_of_next_month(start)?))
        }
        [year, month, day] => {
            let start = NaiveDate::from_ymd_opt(
                number(year, 4)?,
                number(month, 2)? as u32,
                number(day, 2)? as u32,
            )?;
            Some((start, start.succ_opt()?))
        }
        _ => None,
    }
}

/// Parse a field of exactly `width` ASCII digits.
fn number(field: &str, width: usize) -> Option<i32> {
    if field.len() != width || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn span(token: &str) -> (DateTime<Utc>, DateTime<Utc>) {
        match resolve(token) {
            ResolvedDateRange::Valid { start, end } => (start, end),
            ResolvedDateRange::Invalid => panic!("{} should resolve", token),
        }
    }

    #[test]
    fn test_year() {
        assert_eq!(span("2010"), (utc(2010, 1, 1), utc(2011, 1, 1)));
    }

    #[test]
    fn test_year_month() {
        assert_eq!(span("2040-08"), (utc(2040, 8, 1), utc(2040, 9, 1)));
        assert_eq!(span("2039-12"), (utc(2039, 12, 1), utc(2040, 1, 1)));
        assert_eq!(span("2024-02"), (utc(2024, 2, 1), utc(2024, 3, 1)));
    }

    #[test]
    fn test_year_month_day() {
        assert_eq!(span("2011-05-20"), (utc(2011, 5, 20), utc(2011, 5, 21)));
        assert_eq!(span("2024-02-29"), (utc(2024, 2, 29), utc(2024, 3, 1)));
        assert_eq!(span("2030-12-31"), (utc(2030, 12, 31), utc(2031, 1, 1)));
    }

    #[test]
    fn test_impossible_dates_are_invalid() {
        assert_eq!(resolve("2040-05-35"), ResolvedDateRange::Invalid);
        assert_eq!(resolve("2010-18"), ResolvedDateRange::Invalid);
        assert_eq!(resolve("2040-05-38"), ResolvedDateRange::Invalid);
        assert_eq!(resolve("2023-02-29"), ResolvedDateRange::Invalid);
        assert_eq!(resolve("2023-02-30"), ResolvedDateRange::Invalid);
        assert_eq!(resolve("2023-00"), ResolvedDateRange::Invalid);
    }

    #[test]
    fn test_malformed_shapes_are_invalid() {
        for token in [
            "", "20", "20100", "2010-5", "2010-05-1", "2010-05-01-02", "yyyy", "2010-ab",
            "2010/05", "+201", "2010-", "-2010", "２０１０",
        ] {
            assert_eq!(resolve(token), ResolvedDateRange::Invalid, "token {:?}", token);
        }
    }

    #[test]
    fn test_contains_is_half_open() {
        let range = resolve("2040-05");
        assert!(range.contains(&utc(2040, 5, 1)));
        assert!(range.contains(&(utc(2040, 6, 1) - chrono::Duration::milliseconds(1))));
        assert!(!range.contains(&utc(2040, 6, 1)));
        assert!(!range.contains(&(utc(2040, 5, 1) - chrono::Duration::milliseconds(1))));
        assert!(!ResolvedDateRange::Invalid.contains(&utc(2040, 5, 1)));
    }

    #[test]
    fn test_current_year_contains_now() {
        let now = Utc::now();
        let range = resolve(&now.format("%Y").to_string());
        assert!(range.is_valid());
        assert!(range.contains(&now));
    }
}
