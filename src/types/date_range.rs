use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq)]
pub enum DateRangeError {
    #[error("'{0}' is not a date in YYYY-MM-DD format")]
    Parse(String, #[source] chrono::ParseError),

    #[error("Start date {start} is after end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },

    #[error("Date range spans {days} days, the maximum is {max_days}")]
    SpanTooLong { days: i64, max_days: i64 },
}

/// An inclusive range of calendar days, validated on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `start > end` and spans (`end - start`) longer than
    /// `max_span_days`.
    pub fn new(start: NaiveDate, end: NaiveDate, max_span_days: i64) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::StartAfterEnd { start, end });
        }
        let days = (end - start).num_days();
        if days > max_span_days {
            return Err(DateRangeError::SpanTooLong {
                days,
                max_days: max_span_days,
            });
        }
        Ok(Self { start, end })
    }

    /// Parses both dates from `YYYY-MM-DD` strings, then validates like [`DateRange::new`].
    pub fn parse(start: &str, end: &str, max_span_days: i64) -> Result<Self, DateRangeError> {
        Self::new(parse_date(start)?, parse_date(end)?, max_span_days)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

pub fn parse_date(input: &str) -> Result<NaiveDate, DateRangeError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|e| DateRangeError::Parse(trimmed.to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_valid_range() {
        let range = DateRange::parse("2024-01-01", " 2024-01-31 ", 31).unwrap();
        assert_eq!(range.start(), date(2024, 1, 1));
        assert_eq!(range.end(), date(2024, 1, 31));
        assert_eq!(range.num_days(), 31);
        assert_eq!(range.to_string(), "2024-01-01 to 2024-01-31");
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::parse("2024-03-05", "2024-03-05", 0).unwrap();
        assert_eq!(range.num_days(), 1);
    }

    #[test]
    fn test_span_limit_is_inclusive() {
        assert!(DateRange::parse("2024-01-01", "2024-02-01", 31).is_ok());
        let err = DateRange::parse("2024-01-01", "2024-02-02", 31).unwrap_err();
        assert_eq!(
            err,
            DateRangeError::SpanTooLong {
                days: 32,
                max_days: 31
            }
        );
    }

    #[test]
    fn test_start_after_end() {
        let err = DateRange::parse("2024-02-01", "2024-01-01", 366).unwrap_err();
        assert!(matches!(err, DateRangeError::StartAfterEnd { .. }));
    }

    #[test]
    fn test_malformed_date() {
        let err = DateRange::parse("01/02/2024", "2024-01-05", 31).unwrap_err();
        assert!(matches!(err, DateRangeError::Parse(ref s, _) if s == "01/02/2024"));
        assert!(parse_date("2024-02-30").is_err());
    }
}
