//! Error types for the contacts directory.

use thiserror::Error;

/// Errors that can occur in contacts operations.
///
/// Age, sorting and reconciliation never fail; only constructors, config
/// loading and the directory seam produce these.
#[derive(Error, Debug)]
pub enum ContactsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid date: month {month}, day {day}")]
    InvalidDate { month: u32, day: u32 },

    #[error("Unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("Contact not found: {0}")]
    NotFound(String),

    #[error("Directory error: {0}")]
    Directory(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for contacts operations.
pub type ContactsResult<T> = Result<T, ContactsError>;
