//! Loaded contact list with exact and partial name lookups.
//!
//! # Invariants
//! - Matching is case-insensitive using Unicode lowercase, so accented
//!   names compare the same way regardless of case.
//! - Results keep the order of the loaded list.

use crate::model::contact::Contact;

/// Snapshot of contacts held by a front end between store reads.
#[derive(Debug, Clone, Default)]
pub struct Agenda {
    contacts: Vec<Contact>,
}

impl Agenda {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current snapshot.
    pub fn load(&mut self, contacts: Vec<Contact>) {
        self.contacts = contacts;
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Contacts whose full name equals `name`, ignoring case.
    pub fn find_exact(&self, name: &str) -> Vec<&Contact> {
        let needle = name.trim().to_lowercase();
        self.contacts
            .iter()
            .filter(|contact| contact.name.to_lowercase() == needle)
            .collect()
    }

    /// Contacts whose name contains `text`, ignoring case.
    ///
    /// Blank `text` matches every contact.
    pub fn find_partial(&self, text: &str) -> Vec<&Contact> {
        let needle = text.trim().to_lowercase();
        self.contacts
            .iter()
            .filter(|contact| contact.name.to_lowercase().contains(&needle))
            .collect()
    }
}

impl From<Vec<Contact>> for Agenda {
    fn from(contacts: Vec<Contact>) -> Self {
        Self { contacts }
    }
}
