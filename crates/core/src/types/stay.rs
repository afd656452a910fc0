//! Stay date ranges.
//!
//! A stay is a half-open interval of nights: a guest arriving on the 1st and
//! leaving on the 3rd occupies `[1st, 3rd)` - the 3rd itself is free for the
//! next arrival. Every availability and restriction comparison in the system
//! goes through [`StayRange::overlaps`], so the half-open convention lives in
//! exactly one place.

use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used in forms, query strings, and JSON: `2050-01-01`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors that can occur when building a [`StayRange`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StayRangeError {
    /// A date string did not parse as `YYYY-MM-DD`.
    #[error("invalid date: {0:?}")]
    BadDate(String),
    /// The departure date is on or before the arrival date.
    #[error("departure must be after arrival")]
    Degenerate,
}

/// A validated half-open date interval `[start, end)`.
///
/// Construction enforces `start < end`; degenerate ranges are
/// unrepresentable, so callers of the availability checker never have to
/// re-validate ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StayRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl StayRange {
    /// Create a range from arrival and departure dates.
    ///
    /// # Errors
    ///
    /// Returns [`StayRangeError::Degenerate`] unless `start < end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, StayRangeError> {
        if start >= end {
            return Err(StayRangeError::Degenerate);
        }
        Ok(Self { start, end })
    }

    /// Parse a range from two `YYYY-MM-DD` strings, as submitted by the
    /// search and booking forms.
    ///
    /// # Errors
    ///
    /// Returns [`StayRangeError::BadDate`] for unparseable input and
    /// [`StayRangeError::Degenerate`] for an out-of-order pair.
    pub fn parse(start: &str, end: &str) -> Result<Self, StayRangeError> {
        let start_date = parse_date(start)?;
        let end_date = parse_date(end)?;
        Self::new(start_date, end_date)
    }

    /// Arrival date (first occupied night).
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Departure date (first free night).
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of nights in the stay. Always at least 1.
    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Half-open overlap test against a stored `[start, end)` interval:
    /// the intervals conflict iff `self.start < end && self.end > start`.
    #[must_use]
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start < end && self.end > start
    }
}

impl fmt::Display for StayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

/// Parse a single `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`StayRangeError::BadDate`] for unparseable input.
pub fn parse_date(s: &str) -> Result<NaiveDate, StayRangeError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| StayRangeError::BadDate(s.to_owned()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn range(start: &str, end: &str) -> StayRange {
        StayRange::parse(start, end).unwrap()
    }

    #[test]
    fn test_degenerate_rejected() {
        assert_eq!(
            StayRange::parse("2050-01-02", "2050-01-01"),
            Err(StayRangeError::Degenerate)
        );
        assert_eq!(
            StayRange::parse("2050-01-01", "2050-01-01"),
            Err(StayRangeError::Degenerate)
        );
    }

    #[test]
    fn test_bad_date_is_validation_error() {
        assert!(matches!(
            StayRange::parse("01/02/2050", "2050-01-03"),
            Err(StayRangeError::BadDate(_))
        ));
        assert!(matches!(
            StayRange::parse("2050-01-01", "not-a-date"),
            Err(StayRangeError::BadDate(_))
        ));
    }

    #[test]
    fn test_overlap_identical() {
        let stay = range("2050-01-01", "2050-01-04");
        assert!(stay.overlaps(date("2050-01-01"), date("2050-01-04")));
    }

    #[test]
    fn test_overlap_partial() {
        let stay = range("2050-01-03", "2050-01-06");
        assert!(stay.overlaps(date("2050-01-01"), date("2050-01-04")));
        assert!(stay.overlaps(date("2050-01-05"), date("2050-01-09")));
        // Contained and containing
        assert!(stay.overlaps(date("2050-01-04"), date("2050-01-05")));
        assert!(stay.overlaps(date("2050-01-01"), date("2050-01-09")));
    }

    #[test]
    fn test_half_open_boundary() {
        // Back-to-back stays share a checkout/checkin day without conflict:
        // [1st, 4th) then [4th, 5th).
        let next = range("2050-01-04", "2050-01-05");
        assert!(!next.overlaps(date("2050-01-01"), date("2050-01-04")));

        let prior = range("2050-01-01", "2050-01-04");
        assert!(!prior.overlaps(date("2050-01-04"), date("2050-01-05")));
    }

    #[test]
    fn test_disjoint() {
        let stay = range("2050-02-01", "2050-02-03");
        assert!(!stay.overlaps(date("2050-01-01"), date("2050-01-05")));
        assert!(!stay.overlaps(date("2050-03-01"), date("2050-03-05")));
    }

    #[test]
    fn test_nights() {
        assert_eq!(range("2050-01-01", "2050-01-02").nights(), 1);
        assert_eq!(range("2050-01-01", "2050-01-08").nights(), 7);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            range("2050-01-01", "2050-01-02").to_string(),
            "2050-01-01 to 2050-01-02"
        );
    }

    #[test]
    fn test_serde_roundtrip() {
        let stay = range("2050-01-01", "2050-01-04");
        let json = serde_json::to_string(&stay).unwrap();
        let parsed: StayRange = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, stay);
    }
}
