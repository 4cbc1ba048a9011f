//! Directory requests and the store that issues them.
//!
//! Requests are plain values. Transport lives behind the [`Directory`]
//! trait; this crate ships no implementation of it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::attributes::{AttributeSet, apply_attributes, attribute_names};
use crate::compare::by_name;
use crate::config::ContactsConfig;
use crate::constants::{CONTACT_OBJECT_CLASSES, CONTACTS_OU, IMMUTABLE_KEY};
use crate::contact::Contact;
use crate::error::{ContactsError, ContactsResult};
use crate::parse::DateParser;
use crate::reconcile::{ChangeSet, Operation};

/// How far below the base a search reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchScope {
    /// Only the base entry itself
    BaseObject,
    /// The base entry and everything below it
    WholeSubtree,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub base_dn: String,
    pub scope: SearchScope,
    pub filter: String,
    pub attributes: Vec<String>,
}

impl SearchRequest {
    /// Contacts under `ou=contacts,<base_dn>` carrying every given label.
    pub fn for_labels(base_dn: &str, labels: &[String]) -> Self {
        let label_filter: String = labels
            .iter()
            .map(|label| format!("(label={})", escape_filter_value(label)))
            .collect();
        SearchRequest {
            base_dn: contacts_base(base_dn),
            scope: SearchScope::WholeSubtree,
            filter: format!("(&(objectClass=contact){label_filter})"),
            attributes: attribute_names::<Contact>()
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    /// The single entry named `dn`.
    pub fn for_entry(base_dn: &str, dn: &str) -> Self {
        SearchRequest {
            base_dn: dn.to_string(),
            scope: SearchScope::BaseObject,
            ..SearchRequest::for_labels(base_dn, &[])
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddRequest {
    pub dn: String,
    pub object_classes: Vec<String>,
    pub attributes: AttributeSet,
}

impl AddRequest {
    /// New entry named after the contact's display name.
    pub fn for_contact(base_dn: &str, contact: &Contact) -> Self {
        AddRequest {
            dn: contact_dn(base_dn, contact),
            object_classes: CONTACT_OBJECT_CLASSES.iter().map(|c| c.to_string()).collect(),
            attributes: contact.attribute_values(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyRequest {
    pub dn: String,
    pub operations: Vec<Operation>,
}

impl ModifyRequest {
    pub fn from_changes(dn: impl Into<String>, changes: &ChangeSet) -> Self {
        ModifyRequest {
            dn: dn.into(),
            operations: changes.operations(),
        }
    }
}

/// An entry returned by a search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub dn: String,
    pub attributes: HashMap<String, Vec<String>>,
}

impl Entry {
    pub fn values(&self, key: &str) -> Vec<String> {
        self.attributes.get(key).cloned().unwrap_or_default()
    }
}

/// A remote directory that can run contact requests.
pub trait Directory {
    fn search(&self, request: &SearchRequest) -> ContactsResult<Vec<Entry>>;
    fn add(&self, request: &AddRequest) -> ContactsResult<()>;
    fn modify(&self, request: &ModifyRequest) -> ContactsResult<()>;
    fn delete(&self, dn: &str) -> ContactsResult<()>;
}

/// What [`ContactStore::save`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created { dn: String },
    Updated { dn: String, changes: ChangeSet },
    Unchanged,
}

/// Contact operations against a [`Directory`].
pub struct ContactStore<'a, D: Directory> {
    directory: &'a D,
    base_dn: String,
    immutable_key: String,
    parser: DateParser,
}

impl<'a, D: Directory> ContactStore<'a, D> {
    pub fn new(directory: &'a D, base_dn: impl Into<String>, parser: DateParser) -> Self {
        ContactStore {
            directory,
            base_dn: base_dn.into(),
            immutable_key: IMMUTABLE_KEY.to_string(),
            parser,
        }
    }

    pub fn from_config(directory: &'a D, config: &ContactsConfig) -> Self {
        ContactStore {
            directory,
            base_dn: config.base_dn.clone(),
            immutable_key: config.immutable_key.clone(),
            parser: config.date_parser(),
        }
    }

    /// Contacts carrying every label in `labels` (all contacts when empty).
    pub fn list(&self, labels: &[String]) -> ContactsResult<Vec<Contact>> {
        let request = SearchRequest::for_labels(&self.base_dn, labels);
        let entries = self.directory.search(&request)?;
        Ok(entries.iter().map(|e| self.contact_from_entry(e)).collect())
    }

    /// The contact stored at `dn`. When the directory returns several
    /// entries the first by name wins.
    pub fn single(&self, dn: &str) -> ContactsResult<Contact> {
        let request = SearchRequest::for_entry(&self.base_dn, dn);
        let mut contacts: Vec<Contact> = self
            .directory
            .search(&request)?
            .iter()
            .map(|e| self.contact_from_entry(e))
            .collect();

        if contacts.len() > 1 {
            tracing::debug!(dn, matches = contacts.len(), "Multiple entries for dn");
            contacts.sort_by(by_name);
        }
        contacts
            .into_iter()
            .next()
            .ok_or_else(|| ContactsError::NotFound(dn.to_string()))
    }

    /// Update `original` in place when both versions share an id, otherwise
    /// create `updated` as a new entry.
    pub fn save(
        &self,
        original: Option<&Contact>,
        updated: &Contact,
    ) -> ContactsResult<SaveOutcome> {
        let original = original.cloned().unwrap_or_default();

        if !updated.id.is_empty() && original.id == updated.id {
            let Some(changes) = original.changes(updated, &self.immutable_key) else {
                return Ok(SaveOutcome::Unchanged);
            };
            if changes.is_empty() {
                return Ok(SaveOutcome::Unchanged);
            }
            let request = ModifyRequest::from_changes(&updated.id, &changes);
            self.directory.modify(&request).map_err(|e| {
                tracing::warn!(dn = %updated.id, error = %e, "Error saving changes");
                ContactsError::Directory(format!("error saving changes: {e}"))
            })?;
            tracing::info!(dn = %updated.id, changes = changes.len(), "Updated contact");
            return Ok(SaveOutcome::Updated {
                dn: updated.id.clone(),
                changes,
            });
        }

        let request = AddRequest::for_contact(&self.base_dn, updated);
        self.directory.add(&request).map_err(|e| {
            tracing::warn!(dn = %request.dn, error = %e, "Error creating contact");
            ContactsError::Directory(format!("error creating contact: {e}"))
        })?;
        tracing::info!(dn = %request.dn, "Created contact");
        Ok(SaveOutcome::Created { dn: request.dn })
    }

    pub fn delete(&self, dn: &str) -> ContactsResult<()> {
        self.directory.delete(dn).map_err(|e| {
            tracing::warn!(dn, error = %e, "Error deleting contact");
            ContactsError::Directory(format!("error deleting: {e}"))
        })?;
        tracing::info!(dn, "Deleted contact");
        Ok(())
    }

    fn contact_from_entry(&self, entry: &Entry) -> Contact {
        let mut contact = Contact {
            id: entry.dn.clone(),
            ..Contact::default()
        };
        apply_attributes(&mut contact, |key| entry.values(key), &self.parser);
        contact
    }
}

/// `ou=contacts,<base_dn>`
pub fn contacts_base(base_dn: &str) -> String {
    format!("{CONTACTS_OU},{base_dn}")
}

/// `cn=<display name>,ou=contacts,<base_dn>`
pub fn contact_dn(base_dn: &str, contact: &Contact) -> String {
    format!(
        "cn={},{}",
        escape_dn_value(&contact.display_name()),
        contacts_base(base_dn)
    )
}

/// Escape filter metacharacters (RFC 4515).
fn escape_filter_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '*' => escaped.push_str("\\2a"),
            '(' => escaped.push_str("\\28"),
            ')' => escaped.push_str("\\29"),
            '\\' => escaped.push_str("\\5c"),
            '\0' => escaped.push_str("\\00"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Escape DN special characters (RFC 4514).
fn escape_dn_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        match c {
            ',' | '+' | '"' | '\\' | '<' | '>' | ';' | '=' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '#' if i == 0 => escaped.push_str("\\#"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::PartialDate;
    use crate::reconcile::ChangeKind;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MemoryDirectory {
        entries: Vec<Entry>,
        added: RefCell<Vec<AddRequest>>,
        modified: RefCell<Vec<ModifyRequest>>,
        deleted: RefCell<Vec<String>>,
        fail: bool,
    }

    impl Directory for MemoryDirectory {
        fn search(&self, request: &SearchRequest) -> ContactsResult<Vec<Entry>> {
            Ok(match request.scope {
                SearchScope::BaseObject => self
                    .entries
                    .iter()
                    .filter(|e| e.dn == request.base_dn)
                    .cloned()
                    .collect(),
                SearchScope::WholeSubtree => self.entries.clone(),
            })
        }

        fn add(&self, request: &AddRequest) -> ContactsResult<()> {
            self.check()?;
            self.added.borrow_mut().push(request.clone());
            Ok(())
        }

        fn modify(&self, request: &ModifyRequest) -> ContactsResult<()> {
            self.check()?;
            self.modified.borrow_mut().push(request.clone());
            Ok(())
        }

        fn delete(&self, dn: &str) -> ContactsResult<()> {
            self.check()?;
            self.deleted.borrow_mut().push(dn.to_string());
            Ok(())
        }
    }

    impl MemoryDirectory {
        fn check(&self) -> ContactsResult<()> {
            if self.fail {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                )
                .into());
            }
            Ok(())
        }
    }

    const BASE: &str = "dc=example,dc=com";

    fn entry(dn: &str, pairs: &[(&str, &[&str])]) -> Entry {
        Entry {
            dn: dn.to_string(),
            attributes: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
                .collect(),
        }
    }

    #[test]
    fn test_search_filter_includes_labels() {
        let request = SearchRequest::for_labels(BASE, &["family".into(), "a(b)".into()]);
        assert_eq!(request.base_dn, "ou=contacts,dc=example,dc=com");
        assert_eq!(
            request.filter,
            "(&(objectClass=contact)(label=family)(label=a\\28b\\29))"
        );
        assert!(request.attributes.contains(&"birthDate".to_string()));
    }

    #[test]
    fn test_list_loads_entries() {
        let directory = MemoryDirectory {
            entries: vec![entry(
                "cn=Ann,ou=contacts,dc=example,dc=com",
                &[
                    ("cn", &["Ann"]),
                    ("sn", &["Smith"]),
                    ("birthDate", &["March 3"]),
                    ("mail", &["ann@x.com", "ann@y.com"]),
                ],
            )],
            ..MemoryDirectory::default()
        };
        let store = ContactStore::new(&directory, BASE, DateParser::default());
        let contacts = store.list(&[]).unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].id, "cn=Ann,ou=contacts,dc=example,dc=com");
        assert_eq!(contacts[0].birthday, PartialDate::month_day(3, 3).unwrap());
        assert_eq!(contacts[0].email.len(), 2);
    }

    #[test]
    fn test_single_not_found() {
        let directory = MemoryDirectory::default();
        let store = ContactStore::new(&directory, BASE, DateParser::default());
        assert!(matches!(
            store.single("cn=Nobody,ou=contacts,dc=example,dc=com"),
            Err(ContactsError::NotFound(_))
        ));
    }

    #[test]
    fn test_single_picks_first_by_name() {
        let dn = "cn=Dup,ou=contacts,dc=example,dc=com";
        let directory = MemoryDirectory {
            entries: vec![
                entry(dn, &[("sn", &["Young"])]),
                entry(dn, &[("sn", &["Adams"])]),
            ],
            ..MemoryDirectory::default()
        };
        let store = ContactStore::new(&directory, BASE, DateParser::default());
        assert_eq!(store.single(dn).unwrap().last, "Adams");
    }

    #[test]
    fn test_save_new_contact_creates_entry() {
        let directory = MemoryDirectory::default();
        let store = ContactStore::new(&directory, BASE, DateParser::default());
        let contact = Contact {
            first: "Ann".into(),
            last: "Smith, Jr".into(),
            ..Contact::default()
        };
        let outcome = store.save(None, &contact).unwrap();
        let dn = "cn=Ann Smith\\, Jr,ou=contacts,dc=example,dc=com".to_string();
        assert_eq!(outcome, SaveOutcome::Created { dn: dn.clone() });
        let added = directory.added.borrow();
        assert_eq!(added[0].dn, dn);
        assert_eq!(added[0].object_classes[0], "contact");
    }

    #[test]
    fn test_save_existing_contact_modifies() {
        let directory = MemoryDirectory::default();
        let store = ContactStore::new(&directory, BASE, DateParser::default());
        let original = Contact {
            id: "cn=Ann,ou=contacts,dc=example,dc=com".into(),
            common_name: "Ann".into(),
            email: vec!["a@x.com".into()],
            ..Contact::default()
        };
        let updated = Contact {
            email: vec!["b@x.com".into()],
            ..original.clone()
        };

        assert_eq!(
            store.save(Some(&original), &original).unwrap(),
            SaveOutcome::Unchanged
        );
        assert!(directory.modified.borrow().is_empty());

        let outcome = store.save(Some(&original), &updated).unwrap();
        assert!(matches!(outcome, SaveOutcome::Updated { .. }));
        let modified = directory.modified.borrow();
        assert_eq!(modified.len(), 1);
        assert_eq!(modified[0].operations[0].kind, ChangeKind::Modify);
        assert_eq!(modified[0].operations[0].values, ["b@x.com"]);
    }

    #[test]
    fn test_renaming_common_name_only_is_unchanged() {
        let directory = MemoryDirectory::default();
        let store = ContactStore::new(&directory, BASE, DateParser::default());
        let original = Contact {
            id: "cn=Ann,ou=contacts,dc=example,dc=com".into(),
            common_name: "Ann".into(),
            ..Contact::default()
        };
        let updated = Contact {
            common_name: "Annie".into(),
            ..original.clone()
        };
        assert_eq!(
            store.save(Some(&original), &updated).unwrap(),
            SaveOutcome::Unchanged
        );
    }

    #[test]
    fn test_directory_failure_is_reported() {
        let directory = MemoryDirectory {
            fail: true,
            ..MemoryDirectory::default()
        };
        let store = ContactStore::new(&directory, BASE, DateParser::default());
        let err = store.save(None, &Contact::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Directory error: error creating contact: IO error: connection refused"
        );

        let original = Contact {
            id: "cn=Ann,ou=contacts,dc=example,dc=com".into(),
            common_name: "Ann".into(),
            ..Contact::default()
        };
        let updated = Contact {
            last: "Adams".into(),
            ..original.clone()
        };
        let err = store.save(Some(&original), &updated).unwrap_err();
        assert!(matches!(err, ContactsError::Directory(_)));
        assert!(err.to_string().ends_with("error saving changes: IO error: connection refused"));

        let err = store.delete(&original.id).unwrap_err();
        assert!(err.to_string().ends_with("error deleting: IO error: connection refused"));
    }

    #[test]
    fn test_store_from_config() {
        let directory = MemoryDirectory::default();
        let config = ContactsConfig {
            base_dn: BASE.to_string(),
            immutable_key: "displayName".to_string(),
            ..ContactsConfig::default()
        };
        let store = ContactStore::from_config(&directory, &config);
        let original = Contact {
            id: "cn=Ann,ou=contacts,dc=example,dc=com".into(),
            name: "Ann".into(),
            ..Contact::default()
        };
        let renamed = Contact {
            name: "Annie".into(),
            ..original.clone()
        };
        assert_eq!(
            store.save(Some(&original), &renamed).unwrap(),
            SaveOutcome::Unchanged
        );
    }

    #[test]
    fn test_delete() {
        let directory = MemoryDirectory::default();
        let store = ContactStore::new(&directory, BASE, DateParser::default());
        store.delete("cn=Ann,ou=contacts,dc=example,dc=com").unwrap();
        assert_eq!(directory.deleted.borrow().len(), 1);
    }
}
