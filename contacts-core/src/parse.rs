//! Birthday string parsing.

use chrono::Datelike;
use chrono::format::{Parsed, StrftimeItems, parse as parse_items};

use crate::constants::{DEFAULT_DATE_FORMATS, LEAP_YEAR};
use crate::date::PartialDate;

/// Parses date strings against an ordered list of chrono formats.
///
/// The list is fixed at construction. Formats without a year component
/// produce [`PartialDate::MonthDay`]; a string that matches nothing becomes
/// [`PartialDate::Unknown`] rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParser {
    formats: Vec<String>,
}

impl Default for DateParser {
    fn default() -> Self {
        DateParser::new(DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()))
    }
}

impl DateParser {
    pub fn new<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DateParser {
            formats: formats.into_iter().map(Into::into).collect(),
        }
    }

    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    pub fn parse(&self, given: &str) -> PartialDate {
        let given = given.trim();
        if given.is_empty() {
            return PartialDate::Unknown;
        }

        for format in &self.formats {
            if let Some(date) = parse_with(format, given) {
                return date;
            }
        }

        tracing::debug!(input = given, "No date format matched");
        PartialDate::Unknown
    }
}

fn parse_with(format: &str, given: &str) -> Option<PartialDate> {
    let mut parsed = Parsed::new();
    parse_items(&mut parsed, given, StrftimeItems::new(format)).ok()?;
    // A weekday name must be spelled correctly but need not agree with the date.
    parsed.weekday = None;

    if has_year(format) {
        return parsed.to_naive_date().ok().map(PartialDate::Full);
    }

    // chrono cannot build a date without a year, so borrow a leap year to
    // validate the month and day (February 29 included).
    parsed.year = Some(LEAP_YEAR);
    let date = parsed.to_naive_date().ok()?;
    Some(PartialDate::MonthDay {
        month: date.month(),
        day: date.day(),
    })
}

fn has_year(format: &str) -> bool {
    ["%Y", "%y", "%C", "%G", "%g", "%D", "%F", "%+", "%c", "%x"]
        .iter()
        .any(|spec| format.contains(spec))
}
