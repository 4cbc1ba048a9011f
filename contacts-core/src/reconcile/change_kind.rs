use std::fmt;

use serde::{Deserialize, Serialize};

/// The directory operation an attribute change maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Attribute gains values it did not have.
    Add,
    /// Attribute is removed with its old values.
    Delete,
    /// Single-valued attribute gets a new value.
    Modify,
    /// Multi-valued attribute is rewritten as a whole.
    Replace,
}

impl ChangeKind {
    /// Order in which a modify request applies the buckets.
    pub const APPLY_ORDER: [ChangeKind; 4] = [
        ChangeKind::Delete,
        ChangeKind::Add,
        ChangeKind::Modify,
        ChangeKind::Replace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Add => "add",
            ChangeKind::Delete => "delete",
            ChangeKind::Modify => "modify",
            ChangeKind::Replace => "replace",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Add => write!(f, "+"),
            ChangeKind::Delete => write!(f, "-"),
            ChangeKind::Modify => write!(f, "~"),
            ChangeKind::Replace => write!(f, "="),
        }
    }
}
