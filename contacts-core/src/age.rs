//! Calendar distance between two instants.
//!
//! [`diff`] subtracts wall-clock fields and cascades borrows upward, so
//! "Jan 31 to Mar 1" is one month and some days rather than a number of
//! elapsed seconds.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::date::days_in_month;

/// A cascading year/month/day/hour/minute/second distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Age {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Age {
    /// Distance between `from` and `to`, in either order.
    pub fn between<A: TimeZone, B: TimeZone>(from: &DateTime<A>, to: &DateTime<B>) -> Self {
        diff(from, to)
    }

    pub fn is_zero(&self) -> bool {
        *self == Age::default()
    }

    pub fn year(&self) -> String {
        stringify(self.years, "Year", "Years")
    }

    pub fn month(&self) -> String {
        stringify(self.months, "Month", "Months")
    }

    pub fn day(&self) -> String {
        stringify(self.days, "Day", "Days")
    }

    pub fn hour(&self) -> String {
        stringify(self.hours, "Hour", "Hours")
    }

    pub fn minute(&self) -> String {
        stringify(self.minutes, "Minute", "Minutes")
    }

    pub fn second(&self) -> String {
        stringify(self.seconds, "Second", "Seconds")
    }

    /// All six fields, zero fields skipped.
    pub fn full(&self) -> String {
        join(&[
            self.year(),
            self.month(),
            self.day(),
            self.hour(),
            self.minute(),
            self.second(),
        ])
    }

    /// The most significant non-zero field, or "" for a zero distance.
    pub fn short(&self) -> String {
        [
            Age::year,
            Age::month,
            Age::day,
            Age::hour,
            Age::minute,
            Age::second,
        ]
        .iter()
        .map(|field| field(self))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
    }
}

/// Years, months and days, zero fields skipped.
impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join(&[self.year(), self.month(), self.day()]))
    }
}

/// Calendar distance between two instants.
///
/// The earlier instant is the start. The later one is converted into the
/// start's timezone before wall-clock fields are compared, so the result
/// does not depend on argument order.
pub fn diff<A: TimeZone, B: TimeZone>(a: &DateTime<A>, b: &DateTime<B>) -> Age {
    if a.naive_utc() <= b.naive_utc() {
        cascade(a.naive_local(), b.with_timezone(&a.timezone()).naive_local())
    } else {
        cascade(b.naive_local(), a.with_timezone(&b.timezone()).naive_local())
    }
}

/// Calendar distance between two wall-clock values, in either order.
pub fn diff_naive(a: NaiveDateTime, b: NaiveDateTime) -> Age {
    if a > b { cascade(b, a) } else { cascade(a, b) }
}

fn cascade(start: NaiveDateTime, end: NaiveDateTime) -> Age {
    let mut years = i64::from(end.year()) - i64::from(start.year());
    let mut months = i64::from(end.month()) - i64::from(start.month());
    let mut days = i64::from(end.day()) - i64::from(start.day());
    let mut hours = i64::from(end.hour()) - i64::from(start.hour());
    let mut minutes = i64::from(end.minute()) - i64::from(start.minute());
    // Leap seconds are reported by chrono as second 59 with extra nanos.
    let mut seconds = i64::from(end.second()) - i64::from(start.second());

    if seconds < 0 {
        seconds += 60;
        minutes -= 1;
    }
    if minutes < 0 {
        minutes += 60;
        hours -= 1;
    }
    if hours < 0 {
        hours += 24;
        days -= 1;
    }
    if days < 0 {
        // Borrow the length of the start month, never the end month.
        days += i64::from(days_in_month(start.year(), start.month()));
        months -= 1;
    }
    if months < 0 {
        months += 12;
        years -= 1;
    }

    Age {
        years: to_field(years),
        months: to_field(months),
        days: to_field(days),
        hours: to_field(hours),
        minutes: to_field(minutes),
        seconds: to_field(seconds),
    }
}

fn to_field(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

fn stringify(amount: u32, singular: &str, plural: &str) -> String {
    match amount {
        0 => String::new(),
        1 => format!("1 {singular}"),
        n => format!("{n} {plural}"),
    }
}

fn join(items: &[String]) -> String {
    items
        .iter()
        .filter(|item| !item.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use chrono_tz::America::New_York;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_borrow_uses_start_month_length() {
        let age = diff(&utc(2023, 1, 31, 0, 0, 0), &utc(2023, 3, 1, 0, 0, 0));
        // months 2, days -30 -> days 1 (31-day January), months 1
        assert_eq!(
            age,
            Age {
                months: 1,
                days: 1,
                ..Age::default()
            }
        );
    }

    #[test]
    fn test_borrow_from_february() {
        let age = diff(&utc(2023, 2, 28, 0, 0, 0), &utc(2023, 3, 27, 0, 0, 0));
        assert_eq!((age.months, age.days), (0, 27));
        let age = diff(&utc(2024, 2, 28, 0, 0, 0), &utc(2024, 3, 27, 0, 0, 0));
        assert_eq!((age.months, age.days), (0, 28));
    }

    #[test]
    fn test_full_cascade() {
        let age = diff(&utc(2020, 12, 31, 23, 59, 59), &utc(2021, 1, 1, 0, 0, 0));
        assert_eq!(
            age,
            Age {
                seconds: 1,
                ..Age::default()
            }
        );
    }

    #[test]
    fn test_order_does_not_matter() {
        let a = utc(1985, 10, 26, 1, 21, 0);
        let b = utc(2015, 10, 21, 16, 29, 0);
        assert_eq!(diff(&a, &b), diff(&b, &a));
        assert_eq!(diff(&a, &b).years, 29);
    }

    #[test]
    fn test_later_instant_converted_to_earlier_zone() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let a = offset.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let b = utc(2024, 5, 1, 10, 0, 0);
        assert!(diff(&a, &b).is_zero());

        let ny = New_York.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let b = utc(2024, 1, 2, 5, 0, 0);
        assert_eq!(
            diff(&ny, &b),
            Age {
                days: 1,
                ..Age::default()
            }
        );
    }

    #[test]
    fn test_mixed_zones_are_symmetric() {
        // 23:00 UTC on Jan 31; the later instant is read as Feb 29 19:30 in New York
        let ny = New_York.with_ymd_and_hms(2024, 1, 31, 18, 0, 0).unwrap();
        let b = utc(2024, 3, 1, 0, 30, 0);
        let expected = Age {
            days: 29,
            hours: 1,
            minutes: 30,
            ..Age::default()
        };
        assert_eq!(diff(&ny, &b), expected);
        assert_eq!(diff(&b, &ny), expected);
    }

    #[test]
    fn test_zero_distance() {
        let a = utc(2024, 2, 29, 8, 30, 0);
        let age = diff(&a, &a);
        assert!(age.is_zero());
        assert_eq!(age.short(), "");
        assert_eq!(age.to_string(), "");
        assert_eq!(age.full(), "");
    }

    #[test]
    fn test_formatting() {
        let age = Age {
            years: 1,
            months: 0,
            days: 3,
            hours: 1,
            minutes: 0,
            seconds: 10,
        };
        assert_eq!(age.year(), "1 Year");
        assert_eq!(age.month(), "");
        assert_eq!(age.day(), "3 Days");
        assert_eq!(age.to_string(), "1 Year 3 Days");
        assert_eq!(age.full(), "1 Year 3 Days 1 Hour 10 Seconds");
        assert_eq!(age.short(), "1 Year");

        let age = Age {
            minutes: 2,
            ..Age::default()
        };
        assert_eq!(age.short(), "2 Minutes");
        assert_eq!(age.to_string(), "");
    }
}
