use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attributes::AttributeSet;
use crate::reconcile::ChangeKind;

/// Attribute changes between two versions of a record, split by the
/// directory operation that applies each one.
///
/// A key appears in at most one bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub add: AttributeSet,
    pub delete: AttributeSet,
    pub modify: AttributeSet,
    pub replace: AttributeSet,
}

/// A single attribute operation for the directory update issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub kind: ChangeKind,
    pub key: String,
    pub values: Vec<String>,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.kind, self.key, self.values.join(", "))
    }
}

impl ChangeSet {
    pub fn bucket(&self, kind: ChangeKind) -> &AttributeSet {
        match kind {
            ChangeKind::Add => &self.add,
            ChangeKind::Delete => &self.delete,
            ChangeKind::Modify => &self.modify,
            ChangeKind::Replace => &self.replace,
        }
    }

    fn bucket_mut(&mut self, kind: ChangeKind) -> &mut AttributeSet {
        match kind {
            ChangeKind::Add => &mut self.add,
            ChangeKind::Delete => &mut self.delete,
            ChangeKind::Modify => &mut self.modify,
            ChangeKind::Replace => &mut self.replace,
        }
    }

    /// Bucket holding `key`, if any.
    pub fn kind_of(&self, key: &str) -> Option<ChangeKind> {
        ChangeKind::APPLY_ORDER
            .into_iter()
            .find(|kind| self.bucket(*kind).contains_key(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.kind_of(key).is_some()
    }

    /// Number of changed attributes across all buckets.
    pub fn len(&self) -> usize {
        ChangeKind::APPLY_ORDER
            .iter()
            .map(|kind| self.bucket(*kind).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Operations in the order a modify request applies them: deletes, adds,
    /// modifies, replaces; keys ascending within a bucket.
    pub fn operations(&self) -> Vec<Operation> {
        ChangeKind::APPLY_ORDER
            .into_iter()
            .flat_map(|kind| {
                self.bucket(kind).iter().map(move |(key, values)| Operation {
                    kind,
                    key: key.to_string(),
                    values: values.to_vec(),
                })
            })
            .collect()
    }
}

/// Classify every attribute that differs between `original` and `updated`.
///
/// Returns `None` when the two sets are identical, so callers can skip the
/// update entirely. `immutable_key` is never placed in a bucket.
///
/// Per key, with an absent key treated as having no values:
/// - same values (order-sensitive): unchanged;
/// - same number of values: `replace` when more than one, else `modify`;
/// - no new values: `delete` with the old values;
/// - no old values: `add` with the new values;
/// - otherwise: `replace` with the new values.
pub fn reconcile(
    original: &AttributeSet,
    updated: &AttributeSet,
    immutable_key: &str,
) -> Option<ChangeSet> {
    if original == updated {
        return None;
    }

    let keys: BTreeSet<&str> = original.keys().chain(updated.keys()).collect();
    let mut changes = ChangeSet::default();

    for key in keys {
        if key == immutable_key {
            continue;
        }
        let old = original.get(key).unwrap_or_default();
        let new = updated.get(key).unwrap_or_default();
        if old == new {
            continue;
        }

        let (kind, values) = if old.len() == new.len() {
            if new.len() > 1 {
                (ChangeKind::Replace, new)
            } else {
                (ChangeKind::Modify, new)
            }
        } else if new.is_empty() {
            (ChangeKind::Delete, old)
        } else if old.is_empty() {
            (ChangeKind::Add, new)
        } else {
            (ChangeKind::Replace, new)
        };
        changes.bucket_mut(kind).insert_raw(key, values);
    }

    tracing::debug!(
        add = changes.add.len(),
        delete = changes.delete.len(),
        modify = changes.modify.len(),
        replace = changes.replace.len(),
        "Reconciled attributes"
    );

    Some(changes)
}
