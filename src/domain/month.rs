use std::{fmt, str::FromStr};

use chrono::{Datelike, Months, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Calendar month key used to bucket expenses.
///
/// Ordering is chronological (year first, then month). The `YYYY-MM` string
/// form only appears when formatting or serializing; years before 1 keep
/// their sign, as in `-001-12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonthParseError {
    #[error("expected YYYY-MM, got `{0}`")]
    Format(String),
    #[error("month out of range: {0}")]
    Month(u32),
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Zero-based month count since year 0, handy for month arithmetic.
    pub fn index(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    /// Signed number of whole months from `self` to `other`.
    pub fn months_until(&self, other: YearMonth) -> i64 {
        other.index() - self.index()
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        Self::of(date)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = MonthParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let (year, month) = trimmed
            .rsplit_once('-')
            .ok_or_else(|| MonthParseError::Format(trimmed.to_string()))?;
        let year: i32 = year
            .parse()
            .map_err(|_| MonthParseError::Format(trimmed.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| MonthParseError::Format(trimmed.to_string()))?;
        YearMonth::new(year, month).ok_or(MonthParseError::Month(month))
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Whole calendar months between two dates, ignoring the day of month.
///
/// Negative when `end` falls in an earlier month than `start`.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i64 {
    YearMonth::of(start).months_until(YearMonth::of(end))
}

/// Moves `date` forward by `months`, clamping the day to the target month's end.
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}
