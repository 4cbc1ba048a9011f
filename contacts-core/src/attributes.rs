//! Directory attributes and the field registry that produces them.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

use crate::parse::DateParser;

/// Attribute key to ordered, deduplicated values.
///
/// Empty value lists are never stored: an absent key means "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Vec<String>>",
    into = "BTreeMap<String, Vec<String>>"
)]
pub struct AttributeSet(BTreeMap<String, Vec<String>>);

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `values` under `key`, dropping duplicates and empty strings.
    /// Nothing is stored when no values remain.
    pub fn insert<I, S>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut deduped: Vec<String> = Vec::new();
        for value in values {
            let value = value.into();
            if !value.is_empty() && !deduped.contains(&value) {
                deduped.push(value);
            }
        }
        let key = key.into();
        if deduped.is_empty() {
            self.0.remove(&key);
        } else {
            self.0.insert(key, deduped);
        }
    }

    /// Store `values` exactly as given. Used for change-set buckets, which
    /// must carry the original values untouched.
    pub(crate) fn insert_raw(&mut self, key: &str, values: &[String]) {
        self.0.insert(key.to_string(), values.to_vec());
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.0.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V, S> FromIterator<(K, V)> for AttributeSet
where
    K: Into<String>,
    V: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut set = AttributeSet::new();
        for (key, values) in iter {
            set.insert(key, values);
        }
        set
    }
}

impl From<BTreeMap<String, Vec<String>>> for AttributeSet {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        map.into_iter().collect()
    }
}

impl From<AttributeSet> for BTreeMap<String, Vec<String>> {
    fn from(set: AttributeSet) -> Self {
        set.0
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One directory attribute of a record type: its key, how to read it and
/// how to write it back.
pub struct AttributeField<T> {
    pub key: &'static str,
    pub get: fn(&T) -> Vec<String>,
    pub set: fn(&mut T, &[String], &DateParser),
}

/// A record type with a static list of directory attributes.
pub trait Attributed: 'static {
    fn fields() -> &'static [AttributeField<Self>]
    where
        Self: Sized;
}

/// Keys of every registered attribute, in registry order.
pub fn attribute_names<T: Attributed>() -> Vec<&'static str> {
    T::fields().iter().map(|field| field.key).collect()
}

/// Values of every registered attribute that is set on `record`.
pub fn attribute_values<T: Attributed>(record: &T) -> AttributeSet {
    let mut set = AttributeSet::new();
    for field in T::fields() {
        set.insert(field.key, (field.get)(record));
    }
    set
}

/// Overwrite every registered attribute of `record` from `lookup`. Keys the
/// lookup does not know are reset to empty.
pub fn apply_attributes<T, F>(record: &mut T, lookup: F, parser: &DateParser)
where
    T: Attributed,
    F: Fn(&str) -> Vec<String>,
{
    for field in T::fields() {
        (field.set)(record, &lookup(field.key), parser);
    }
}

/// First value, or empty.
pub(crate) fn first(values: &[String]) -> String {
    values.first().cloned().unwrap_or_default()
}

/// A single-valued field, omitted when empty.
pub(crate) fn single(value: &str) -> Vec<String> {
    if value.is_empty() {
        Vec::new()
    } else {
        vec![value.to_string()]
    }
}
