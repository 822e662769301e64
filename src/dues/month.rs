use std::{fmt, str::FromStr};

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::DuesError;
use crate::time::Clock;

/// A calendar month, stored as its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(NaiveDate);

impl Month {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// Normalizes any date to the month that contains it.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    pub fn first_day(self) -> NaiveDate {
        self.0
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// The following calendar month, or `None` past the end of the supported calendar.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add_months(Months::new(1)).map(Self)
    }
}

impl From<NaiveDate> for Month {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// Accepts `YYYY-MM` or `YYYY-MM-DD`; a day component is dropped.
impl FromStr for Month {
    type Err = DuesError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let parsed = match trimmed.matches('-').count() {
            1 => NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d"),
            2 => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"),
            _ => return Err(DuesError::InvalidMonth(raw.to_string())),
        };
        parsed
            .map(Self::from_date)
            .map_err(|_| DuesError::InvalidMonth(raw.to_string()))
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Inclusive, ascending iterator over the months between two bounds.
#[derive(Debug, Clone)]
pub struct MonthRange {
    next: Option<Month>,
    end: Month,
}

impl MonthRange {
    pub fn new(start: Month, end: Month) -> Self {
        Self {
            next: Some(start),
            end,
        }
    }

    /// Builds the range spanning two arbitrary dates, normalizing both to their months.
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self::new(Month::from_date(from), Month::from_date(to))
    }
}

impl Iterator for MonthRange {
    type Item = Month;

    fn next(&mut self) -> Option<Month> {
        let current = self.next.filter(|month| *month <= self.end)?;
        self.next = current.next();
        Some(current)
    }
}

/// Expands `start..=end` into first-of-month dates.
///
/// When `end` is `None` the range closes on the clock's current month, read at call time.
/// A start after the end yields an empty sequence.
pub fn month_range<C: Clock + ?Sized>(
    start: Month,
    end: Option<Month>,
    clock: &C,
) -> Vec<NaiveDate> {
    let end = end.unwrap_or_else(|| clock.current_month());
    MonthRange::new(start, end).map(Month::first_day).collect()
}
