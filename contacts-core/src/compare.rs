//! Deterministic orderings for contact and anniversary listings.
//!
//! Every comparator ends in a display-name tie-break. Records that are still
//! equal keep their input order, so callers must use a stable sort
//! (`slice::sort_by`), which the `sort_*` helpers do.

use std::borrow::Cow;
use std::cmp::Ordering;

use crate::date::PartialDate;

/// A record that can appear in a sorted listing.
pub trait Sortable {
    fn last_name(&self) -> &str {
        ""
    }

    fn first_name(&self) -> &str {
        ""
    }

    fn display_name(&self) -> Cow<'_, str>;

    fn date(&self) -> PartialDate {
        PartialDate::Unknown
    }
}

/// Last name, then first name, then display name.
pub fn by_name<T: Sortable + ?Sized>(lhs: &T, rhs: &T) -> Ordering {
    lhs.last_name()
        .cmp(rhs.last_name())
        .then_with(|| lhs.first_name().cmp(rhs.first_name()))
        .then_with(|| by_display_name(lhs, rhs))
}

pub fn by_display_name<T: Sortable + ?Sized>(lhs: &T, rhs: &T) -> Ordering {
    lhs.display_name().cmp(&rhs.display_name())
}

/// Month, then day, then year, then display name.
///
/// Builds a recurring yearly calendar: how long ago the year was does not
/// matter. A missing year sorts before any real year and an unknown date
/// sorts before January 1.
pub fn by_partial_date<T: Sortable + ?Sized>(lhs: &T, rhs: &T) -> Ordering {
    lhs.date()
        .sort_key()
        .cmp(&rhs.date().sort_key())
        .then_with(|| by_display_name(lhs, rhs))
}

/// Chronological order, then display name.
///
/// Unknown dates come first, then yearless dates by month/day, then
/// complete dates by date.
pub fn by_event<T: Sortable + ?Sized>(lhs: &T, rhs: &T) -> Ordering {
    event_key(&lhs.date())
        .cmp(&event_key(&rhs.date()))
        .then_with(|| by_display_name(lhs, rhs))
}

pub fn sort_by_name<T: Sortable>(records: &mut [T]) {
    records.sort_by(by_name);
}

pub fn sort_by_display_name<T: Sortable>(records: &mut [T]) {
    records.sort_by(by_display_name);
}

pub fn sort_by_partial_date<T: Sortable>(records: &mut [T]) {
    records.sort_by(by_partial_date);
}

pub fn sort_by_event<T: Sortable>(records: &mut [T]) {
    records.sort_by(by_event);
}

fn event_key(date: &PartialDate) -> (u8, i32, u32, u32) {
    match date {
        PartialDate::Unknown => (0, 0, 0, 0),
        PartialDate::MonthDay { month, day } => (1, 0, *month, *day),
        PartialDate::Full(_) => (
            2,
            date.year().unwrap_or_default(),
            date.month().unwrap_or_default(),
            date.day().unwrap_or_default(),
        ),
    }
}

impl<T: Sortable + ?Sized> Sortable for &T {
    fn last_name(&self) -> &str {
        (**self).last_name()
    }

    fn first_name(&self) -> &str {
        (**self).first_name()
    }

    fn display_name(&self) -> Cow<'_, str> {
        (**self).display_name()
    }

    fn date(&self) -> PartialDate {
        (**self).date()
    }
}
