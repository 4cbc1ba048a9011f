//! Named yearly events for birthday and anniversary calendars.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::age::Age;
use crate::compare::Sortable;
use crate::contact::Contact;
use crate::date::PartialDate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anniversary {
    pub name: String,
    pub event: PartialDate,
}

impl Anniversary {
    pub fn new(name: impl Into<String>, event: PartialDate) -> Self {
        Anniversary {
            name: name.into(),
            event,
        }
    }

    /// Birthday entry for a contact.
    pub fn birthday_of(contact: &Contact) -> Self {
        Anniversary::new(contact.display_name(), contact.birthday)
    }

    /// Time since the event, or since its most recent occurrence when it has
    /// no year.
    pub fn age<Tz: TimeZone>(&self, as_of: &DateTime<Tz>) -> Option<Age> {
        self.event.age_as_of(as_of)
    }

    /// Time until the next occurrence.
    pub fn away<Tz: TimeZone>(&self, as_of: &DateTime<Tz>) -> Option<Age> {
        self.event.until_next(as_of)
    }

    /// One line of a birthday listing: date, name and either the age (dated
    /// events) or the time until the next occurrence (yearless events).
    pub fn summary<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> String {
        match self.event {
            PartialDate::Unknown => format!("{:<15} {:<35}", "", self.name),
            PartialDate::Full(_) => format!(
                "{:<15} {:<35}  Age: {}",
                self.event.short_date(),
                self.name,
                self.age(now).unwrap_or_default()
            ),
            PartialDate::MonthDay { .. } => format!(
                "{:<15} {:<35} Away: {}",
                self.event.short_date(),
                self.name,
                self.away(now).unwrap_or_default()
            ),
        }
    }
}

impl fmt::Display for Anniversary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<15} {}", self.event.short_date(), self.name)
    }
}

impl Sortable for Anniversary {
    fn display_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn date(&self) -> PartialDate {
        self.event
    }
}
