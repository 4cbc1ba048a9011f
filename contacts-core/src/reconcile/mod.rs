//! Attribute reconciliation for minimal directory updates.

mod change_kind;
mod change_set;

pub use change_kind::ChangeKind;
pub use change_set::{ChangeSet, Operation, reconcile};
