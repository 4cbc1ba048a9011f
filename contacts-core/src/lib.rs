//! Core of the contacts directory.
//!
//! Everything here is pure and synchronous:
//! - `age` and `date` compute calendar distances and yearly occurrences
//! - `compare` orders contacts and anniversaries for listings
//! - `reconcile` classifies attribute changes into directory operations
//! - `directory` builds requests for any [`directory::Directory`]

pub mod age;
pub mod anniversary;
pub mod attributes;
pub mod compare;
pub mod config;
pub mod constants;
pub mod contact;
pub mod date;
pub mod directory;
pub mod error;
pub mod parse;
pub mod reconcile;

pub use age::{Age, diff};
pub use anniversary::Anniversary;
pub use attributes::AttributeSet;
pub use config::ContactsConfig;
pub use contact::Contact;
pub use date::PartialDate;
pub use error::{ContactsError, ContactsResult};
pub use parse::DateParser;
pub use reconcile::{ChangeKind, ChangeSet, reconcile};
