//! Analysis window and date input.

use crate::error::AnalysisError;
use chrono::{Duration, NaiveDate};
use std::fmt;

/// Default lookback when no start date is given, in calendar days.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 7 * 365;

const DATE_FORMATS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];

/// Parse a date given as `MM/DD/YYYY` or `YYYY-MM-DD`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tuck::parse_date;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
/// assert_eq!(parse_date("03/08/2024").unwrap(), date);
/// assert_eq!(parse_date("2024-03-08").unwrap(), date);
/// ```
pub fn parse_date(input: &str) -> Result<NaiveDate, AnalysisError> {
    let input = input.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        .ok_or_else(|| AnalysisError::InvalidDate(input.to_string()))
}

/// Inclusive date range of an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl AnalysisPeriod {
    /// Create a period, rejecting a start after the end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AnalysisError> {
        if start > end {
            return Err(AnalysisError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    /// The default window ending at `end`.
    pub fn ending(end: NaiveDate) -> Self {
        Self {
            start: end - Duration::days(DEFAULT_LOOKBACK_DAYS),
            end,
        }
    }

    /// Build a period from optional user input.
    ///
    /// # Arguments
    ///
    /// * `start` - Start date text; defaults to [`DEFAULT_LOOKBACK_DAYS`] before the end
    /// * `end` - End date text; defaults to `today`
    /// * `today` - Current date
    pub fn from_inputs(
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, AnalysisError> {
        let end = match end.map(str::trim).filter(|s| !s.is_empty()) {
            Some(text) => parse_date(text)?,
            None => today,
        };
        match start.map(str::trim).filter(|s| !s.is_empty()) {
            Some(text) => Self::new(parse_date(text)?, end),
            None => Ok(Self::ending(end)),
        }
    }

    /// First day of the window.
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the window.
    pub const fn end(&self) -> NaiveDate {
        self.end
    }
}

impl fmt::Display for AnalysisPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%m/%d/%Y"),
            self.end.format("%m/%d/%Y")
        )
    }
}
