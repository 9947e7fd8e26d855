//! Target periods: the (month, year) window a run extracts.

use anyhow::Result;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::record::DATE_FORMAT;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("month must be between 1 and 12, got {0}")]
    Month(u32),
    #[error("year must have four digits, got {0}")]
    Year(i32),
    #[error("expected MM/YYYY, got '{0}'")]
    Format(String),
}

/// A calendar month of a specific year (month is 1-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    month: u32,
    year: i32,
}

impl Period {
    pub fn new(month: u32, year: i32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::Month(month));
        }
        if !(1000..=9999).contains(&year) {
            return Err(PeriodError::Year(year));
        }
        Ok(Self { month, year })
    }

    /// The period a date falls in
    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            year: date.year(),
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.month() == self.month && date.year() == self.year
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                month: 12,
                year: self.year - 1,
            }
        } else {
            Self {
                month: self.month - 1,
                year: self.year,
            }
        }
    }

    /// Month before the one `now` falls in, as seen from the IANA zone `tz`.
    ///
    /// Statements are usually reconciled once the month has closed, so this is
    /// the default target when none is given.
    pub fn previous_month_in(tz: &str, now: DateTime<Utc>) -> Result<Self> {
        let tz: Tz = tz
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;
        let local = now.with_timezone(&tz).date_naive();
        Ok(Self::of(local).previous())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    /// Parse "MM/YYYY" (single-digit months allowed)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (m, y) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| PeriodError::Format(s.to_string()))?;
        let month: u32 = m.trim().parse().map_err(|_| PeriodError::Format(s.to_string()))?;
        let year: i32 = y.trim().parse().map_err(|_| PeriodError::Format(s.to_string()))?;
        Self::new(month, year)
    }
}

/// Format a date in the canonical DD/MM/YYYY output form
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_rejects_bad_month_and_year() {
        assert_eq!(Period::new(0, 2025), Err(PeriodError::Month(0)));
        assert_eq!(Period::new(13, 2025), Err(PeriodError::Month(13)));
        assert_eq!(Period::new(10, 25), Err(PeriodError::Year(25)));
        assert!(Period::new(12, 2025).is_ok());
    }

    #[test]
    fn test_contains() {
        let oct = Period::new(10, 2025).unwrap();
        assert!(oct.contains(NaiveDate::from_ymd_opt(2025, 10, 31).unwrap()));
        assert!(!oct.contains(NaiveDate::from_ymd_opt(2025, 9, 30).unwrap()));
        assert!(!oct.contains(NaiveDate::from_ymd_opt(2024, 10, 1).unwrap()));
    }

    #[test]
    fn test_previous_wraps_year() {
        let jan = Period::new(1, 2026).unwrap();
        assert_eq!(jan.previous(), Period::new(12, 2025).unwrap());
    }

    #[test]
    fn test_previous_month_respects_timezone() {
        // 2025-10-31 20:00 UTC is already 1 Nov in Kolkata (UTC+5:30)
        let now = Utc.with_ymd_and_hms(2025, 10, 31, 20, 0, 0).unwrap();
        let kolkata = Period::previous_month_in("Asia/Kolkata", now).unwrap();
        assert_eq!(kolkata, Period::new(10, 2025).unwrap());
        let utc = Period::previous_month_in("UTC", now).unwrap();
        assert_eq!(utc, Period::new(9, 2025).unwrap());
        assert!(Period::previous_month_in("Mars/Olympus", now).is_err());
    }

    #[test]
    fn test_parse_and_display() {
        let p: Period = "10/2025".parse().unwrap();
        assert_eq!(p.to_string(), "10/2025");
        let p: Period = "3/2024".parse().unwrap();
        assert_eq!(p.to_string(), "03/2024");
        assert!("2025-10".parse::<Period>().is_err());
        assert_eq!("13/2025".parse::<Period>(), Err(PeriodError::Month(13)));
    }

    #[test]
    fn test_format_date() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(format_date(d), "05/01/2025");
    }
}
