/// Attribute holding the record's common name. It identifies the entry in
/// the directory and is never part of a change-set.
pub const IMMUTABLE_KEY: &str = "cn";

/// Organizational unit that holds every contact entry.
pub const CONTACTS_OU: &str = "ou=contacts";

/// Object classes attached to newly created contact entries.
pub const CONTACT_OBJECT_CLASSES: &[&str] = &[
    "contact",
    "inetOrgPerson",
    "organizationalPerson",
    "person",
    "top",
];

/// Accepted birthday formats, tried in order. The first match wins.
///
/// Patterns without `%Y`/`%y` produce a yearless date.
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%A, %B %d, %Y",
    "%A, %B %e, %Y",
    "%B %d, %Y",
    "%B %e, %Y",
    "%B %d",
    "%B %e",
    "%b %d, %Y",
    "%b %e, %Y",
    "%b %d",
    "%b %e",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m/%d",
];

/// Long date layout for dates with a year ("Monday, January 2, 2006").
pub const LONG_DATE_FORMAT: &str = "%A, %B %-d, %Y";

/// Long date layout for yearless dates ("January 2").
pub const LONG_MONTH_DAY_FORMAT: &str = "%B %-d";

/// Short date layout for dates with a year ("Jan  2, 2006").
pub const SHORT_DATE_FORMAT: &str = "%b %e, %Y";

/// Short date layout for yearless dates ("Jan  2").
pub const SHORT_MONTH_DAY_FORMAT: &str = "%b %e";

/// Leap year used to validate and format yearless dates.
pub(crate) const LEAP_YEAR: i32 = 2000;
