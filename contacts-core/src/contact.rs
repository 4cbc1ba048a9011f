//! Contact records and their directory attributes.

use std::borrow::Cow;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::age::Age;
use crate::attributes::{AttributeField, AttributeSet, Attributed, attribute_values, first, single};
use crate::compare::Sortable;
use crate::date::PartialDate;
use crate::reconcile::{ChangeSet, reconcile};

/// A contact entry (provider-neutral)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Distinguished name of the directory entry; empty until created
    pub id: String,
    pub name: String,
    pub first: String,
    pub last: String,
    pub suffix: String,
    pub birthday: PartialDate,
    pub email: Vec<String>,
    pub phone: Vec<String>,
    pub labels: Vec<String>,
    /// Common name (`cn`), the entry's immutable naming attribute
    pub common_name: String,
    pub street: Vec<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

static CONTACT_FIELDS: &[AttributeField<Contact>] = &[
    AttributeField {
        key: "displayName",
        get: |c| single(&c.name),
        set: |c, v, _| c.name = first(v),
    },
    AttributeField {
        key: "givenName",
        get: |c| single(&c.first),
        set: |c, v, _| c.first = first(v),
    },
    AttributeField {
        key: "sn",
        get: |c| single(&c.last),
        set: |c, v, _| c.last = first(v),
    },
    AttributeField {
        key: "generationQualifier",
        get: |c| single(&c.suffix),
        set: |c, v, _| c.suffix = first(v),
    },
    AttributeField {
        key: "birthDate",
        get: |c| single(&c.birthday.long_date()),
        set: |c, v, parser| c.birthday = parser.parse(&first(v)),
    },
    AttributeField {
        key: "mail",
        get: |c| c.email.clone(),
        set: |c, v, _| c.email = v.to_vec(),
    },
    AttributeField {
        key: "telephoneNumber",
        get: |c| c.phone.clone(),
        set: |c, v, _| c.phone = v.to_vec(),
    },
    AttributeField {
        key: "label",
        get: |c| c.labels.clone(),
        set: |c, v, _| c.labels = v.to_vec(),
    },
    AttributeField {
        key: "cn",
        get: |c| single(&c.common_name),
        set: |c, v, _| c.common_name = first(v),
    },
    AttributeField {
        key: "street",
        get: |c| c.street.clone(),
        set: |c, v, _| c.street = v.to_vec(),
    },
    AttributeField {
        key: "l",
        get: |c| single(&c.city),
        set: |c, v, _| c.city = first(v),
    },
    AttributeField {
        key: "st",
        get: |c| single(&c.state),
        set: |c, v, _| c.state = first(v),
    },
    AttributeField {
        key: "postalCode",
        get: |c| single(&c.zip),
        set: |c, v, _| c.zip = first(v),
    },
    AttributeField {
        key: "countryCode",
        get: |c| single(&c.country),
        set: |c, v, _| c.country = first(v),
    },
];

impl Attributed for Contact {
    fn fields() -> &'static [AttributeField<Self>] {
        CONTACT_FIELDS
    }
}

impl Contact {
    /// Explicit display name, else common name, else "First Last".
    pub fn display_name(&self) -> Cow<'_, str> {
        if !self.name.is_empty() {
            return Cow::Borrowed(&self.name);
        }
        if !self.common_name.is_empty() {
            return Cow::Borrowed(&self.common_name);
        }
        Cow::Owned(format!("{} {}", self.first.trim(), self.last.trim()))
    }

    pub fn attribute_values(&self) -> AttributeSet {
        attribute_values(self)
    }

    /// Changes turning `self` into `updated`; `None` when nothing differs.
    pub fn changes(&self, updated: &Contact, immutable_key: &str) -> Option<ChangeSet> {
        reconcile(
            &self.attribute_values(),
            &updated.attribute_values(),
            immutable_key,
        )
    }

    /// Age as of `date`. Only birthdays with a year have one.
    pub fn age_on<Tz: TimeZone>(&self, date: &DateTime<Tz>) -> Option<Age> {
        if !self.birthday.has_year() {
            return None;
        }
        self.birthday.age_as_of(date)
    }

    pub fn birth_date(&self) -> String {
        self.birthday.short_date()
    }

    pub fn full_birth_date(&self) -> String {
        self.birthday.long_date()
    }

    pub fn birth_day_of_week(&self) -> String {
        self.birthday.weekday_name()
    }

    pub fn birth_month(&self) -> String {
        self.birthday.month_name()
    }

    pub fn birth_day_of_month(&self) -> Option<u32> {
        self.birthday.day()
    }

    pub fn birth_year(&self) -> Option<i32> {
        self.birthday.year()
    }
}

impl Sortable for Contact {
    fn last_name(&self) -> &str {
        &self.last
    }

    fn first_name(&self) -> &str {
        &self.first
    }

    fn display_name(&self) -> Cow<'_, str> {
        Contact::display_name(self)
    }

    fn date(&self) -> PartialDate {
        self.birthday
    }
}
