//! Dates that may omit their year.
//!
//! Birthdays and anniversaries are often recorded as "July 4" with no year.
//! `PartialDate` makes that a checked branch instead of a magic zero year.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::age::{Age, diff_naive};
use crate::constants::{
    LEAP_YEAR, LONG_DATE_FORMAT, LONG_MONTH_DAY_FORMAT, SHORT_DATE_FORMAT, SHORT_MONTH_DAY_FORMAT,
};
use crate::error::{ContactsError, ContactsResult};

/// A calendar date with an optional year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "StoredDate")]
pub enum PartialDate {
    /// No date recorded.
    #[default]
    Unknown,
    /// A recurring date without a year.
    MonthDay { month: u32, day: u32 },
    /// A complete date.
    Full(NaiveDate),
}

/// Serialized shape of [`PartialDate`], checked through the constructors on
/// the way in.
#[derive(Deserialize)]
enum StoredDate {
    Unknown,
    MonthDay { month: u32, day: u32 },
    Full(NaiveDate),
}

impl TryFrom<StoredDate> for PartialDate {
    type Error = ContactsError;

    fn try_from(stored: StoredDate) -> ContactsResult<Self> {
        match stored {
            StoredDate::Unknown => Ok(PartialDate::Unknown),
            StoredDate::MonthDay { month, day } => PartialDate::month_day(month, day),
            StoredDate::Full(date) => Ok(PartialDate::Full(date)),
        }
    }
}

impl PartialDate {
    /// Build a yearless date. February 29 is accepted.
    pub fn month_day(month: u32, day: u32) -> ContactsResult<Self> {
        NaiveDate::from_ymd_opt(LEAP_YEAR, month, day)
            .map(|_| PartialDate::MonthDay { month, day })
            .ok_or(ContactsError::InvalidDate { month, day })
    }

    /// Build a complete date.
    pub fn ymd(year: i32, month: u32, day: u32) -> ContactsResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(PartialDate::Full)
            .ok_or(ContactsError::InvalidDate { month, day })
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, PartialDate::Unknown)
    }

    pub fn has_year(&self) -> bool {
        matches!(self, PartialDate::Full(_))
    }

    pub fn year(&self) -> Option<i32> {
        match self {
            PartialDate::Full(d) => Some(d.year()),
            _ => None,
        }
    }

    pub fn month(&self) -> Option<u32> {
        match self {
            PartialDate::Unknown => None,
            PartialDate::MonthDay { month, .. } => Some(*month),
            PartialDate::Full(d) => Some(d.month()),
        }
    }

    pub fn day(&self) -> Option<u32> {
        match self {
            PartialDate::Unknown => None,
            PartialDate::MonthDay { day, .. } => Some(*day),
            PartialDate::Full(d) => Some(d.day()),
        }
    }

    /// Sort key `(month, day, year)`. Unknown dates are `(0, 0, None)` and a
    /// missing year sorts before any real year.
    pub fn sort_key(&self) -> (u32, u32, Option<i32>) {
        (
            self.month().unwrap_or(0),
            self.day().unwrap_or(0),
            self.year(),
        )
    }

    /// Place the month/day of this date in `year`.
    ///
    /// February 29 in a non-leap year rolls over to March 1.
    pub fn in_year(&self, year: i32) -> Option<NaiveDate> {
        let (month, day) = (self.month()?, self.day()?);
        NaiveDate::from_ymd_opt(year, month, day).or_else(|| match (month, day) {
            (2, 29) => NaiveDate::from_ymd_opt(year, 3, 1),
            _ => None,
        })
    }

    /// Age of this date as of `reference`.
    ///
    /// Complete dates are diffed directly. Yearless dates report the time
    /// since their most recent occurrence on or before `reference`, so the
    /// result is never negative and always under a year.
    pub fn age_as_of<Tz: TimeZone>(&self, reference: &DateTime<Tz>) -> Option<Age> {
        let now = reference.naive_local();
        let event = match self {
            PartialDate::Unknown => return None,
            PartialDate::Full(d) => at_midnight(*d),
            PartialDate::MonthDay { .. } => {
                let candidate = at_midnight(self.in_year(now.year())?);
                if candidate > now {
                    at_midnight(self.in_year(now.year() - 1)?)
                } else {
                    candidate
                }
            }
        };
        Some(diff_naive(event, now))
    }

    /// First occurrence of this month/day on or after `on`. The year of a
    /// complete date is ignored.
    pub fn next_occurrence(&self, on: NaiveDate) -> Option<NaiveDate> {
        let candidate = self.in_year(on.year())?;
        if candidate < on {
            self.in_year(on.year() + 1)
        } else {
            Some(candidate)
        }
    }

    /// Time remaining from `reference` until the next occurrence.
    pub fn until_next<Tz: TimeZone>(&self, reference: &DateTime<Tz>) -> Option<Age> {
        let now = reference.naive_local();
        let next = at_midnight(self.next_occurrence(now.date())?);
        // An occurrence earlier today has already passed.
        let next = if next < now {
            at_midnight(self.in_year(next.year() + 1)?)
        } else {
            next
        };
        Some(diff_naive(now, next))
    }

    /// "Monday, January 2, 2006", or "January 2" without a year.
    pub fn long_date(&self) -> String {
        self.format(LONG_DATE_FORMAT, LONG_MONTH_DAY_FORMAT)
    }

    /// "Jan  2, 2006", or "Jan  2" without a year.
    pub fn short_date(&self) -> String {
        self.format(SHORT_DATE_FORMAT, SHORT_MONTH_DAY_FORMAT)
    }

    /// Weekday name; only complete dates have one.
    pub fn weekday_name(&self) -> String {
        match self {
            PartialDate::Full(d) => d.format("%A").to_string(),
            _ => String::new(),
        }
    }

    pub fn month_name(&self) -> String {
        self.in_year(LEAP_YEAR)
            .map(|d| d.format("%B").to_string())
            .unwrap_or_default()
    }

    fn format(&self, full: &str, month_day: &str) -> String {
        match self {
            PartialDate::Unknown => String::new(),
            PartialDate::Full(d) => d.format(full).to_string(),
            PartialDate::MonthDay { .. } => self
                .in_year(LEAP_YEAR)
                .map(|d| d.format(month_day).to_string())
                .unwrap_or_default(),
        }
    }
}

impl From<NaiveDate> for PartialDate {
    fn from(date: NaiveDate) -> Self {
        PartialDate::Full(date)
    }
}

impl fmt::Display for PartialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.long_date())
    }
}

/// Number of days in `month` of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

fn at_midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}
