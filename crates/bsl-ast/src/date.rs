//! Calendar date literals (`'20240131'`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A calendar date with day precision.
///
/// Serialized as its `YYYYMMDD` literal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Date {
    year: u16,
    month: u8,
    day: u8,
}

/// Rejected date components or literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Year outside `1..=9999`.
    Year(u32),
    /// Month outside `1..=12`.
    Month(u32),
    /// Day not present in the given month.
    Day { year: u16, month: u8, day: u32 },
    /// Literal text is not eight ASCII digits.
    Format(String),
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(y) => write!(f, "year out of range: {y}"),
            Self::Month(m) => write!(f, "month out of range: {m}"),
            Self::Day { year, month, day } => {
                write!(f, "day {day} does not exist in {year:04}-{month:02}")
            }
            Self::Format(s) => write!(f, "invalid date literal: {s:?}"),
        }
    }
}

impl std::error::Error for DateError {}

impl Date {
    pub fn new(year: u32, month: u32, day: u32) -> Result<Self, DateError> {
        if !(1..=9999).contains(&year) {
            return Err(DateError::Year(year));
        }
        if !(1..=12).contains(&month) {
            return Err(DateError::Month(month));
        }
        let (year, month) = (year as u16, month as u8);
        if day == 0 || day > u32::from(days_in_month(year, month)) {
            return Err(DateError::Day { year, month, day });
        }
        Ok(Self {
            year,
            month,
            day: day as u8,
        })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }
}

fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Formats as `YYYYMMDD`.
impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for Date {
    type Err = DateError;

    /// Parses `YYYYMMDD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DateError::Format(s.to_string()));
        }
        let field = |range: std::ops::Range<usize>| -> Result<u32, DateError> {
            s[range]
                .parse()
                .map_err(|_| DateError::Format(s.to_string()))
        };
        Date::new(field(0..4)?, field(4..6)?, field(6..8)?)
    }
}

impl TryFrom<String> for Date {
    type Error = DateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Date> for String {
    fn from(date: Date) -> Self {
        date.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_as_eight_digits() {
        let date = Date::new(2024, 1, 5).unwrap();
        assert_eq!(date.to_string(), "20240105");
        assert_eq!(Date::new(812, 12, 31).unwrap().to_string(), "08121231");
    }

    #[test]
    fn parses_literal_text() {
        let date: Date = "20240229".parse().unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 2, 29));
    }

    #[test]
    fn rejects_missing_day() {
        assert_eq!(
            Date::new(2023, 2, 29),
            Err(DateError::Day {
                year: 2023,
                month: 2,
                day: 29
            })
        );
        assert_eq!(Date::new(2000, 13, 1), Err(DateError::Month(13)));
        assert_eq!(Date::new(0, 1, 1), Err(DateError::Year(0)));
    }

    #[test]
    fn rejects_malformed_text() {
        assert!(matches!("2024-01-01".parse::<Date>(), Err(DateError::Format(_))));
        assert!(matches!("2024011".parse::<Date>(), Err(DateError::Format(_))));
    }

    #[test]
    fn century_leap_years() {
        assert!(Date::new(2000, 2, 29).is_ok());
        assert!(Date::new(1900, 2, 29).is_err());
    }
}
