//! File-backed contact store with per-operation connections.
//!
//! # Responsibility
//! - Own the database path; callers construct one store and pass it around.
//! - Run each operation on its own short-lived connection.
//! - Turn storage failures into the failure indicator of each operation.
//!
//! # Invariants
//! - `ensure_schema` runs before any other operation (`ContactStore::open`).
//! - No operation panics or returns a storage error; failures are logged as
//!   `status=error` and surface as `false`, `None` or an empty list.

use crate::db::{connect, ensure_schema, open_db, DbResult, SchemaReport};
use crate::model::contact::{Contact, ContactId, NewContact};
use crate::repo::contact_repo::{
    ContactListQuery, ContactRepository, RepoError, RepoResult, SqliteContactRepository,
};
use log::{debug, error};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Contact store bound to one SQLite file.
#[derive(Debug, Clone)]
pub struct ContactStore {
    path: PathBuf,
}

impl ContactStore {
    /// Creates a store without touching the file.
    ///
    /// Call [`ContactStore::ensure_schema`] before any other operation, or
    /// use [`ContactStore::open`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store and ensures the schema once.
    ///
    /// Unlike the per-operation methods this propagates errors, so startup
    /// can refuse to continue on an unusable file.
    pub fn open(path: impl Into<PathBuf>) -> DbResult<Self> {
        let store = Self::new(path);
        open_db(&store.path)?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Guarantees the contact table exists in its current shape.
    ///
    /// Returns `None` when the file cannot be opened or repaired.
    pub fn ensure_schema(&self) -> Option<SchemaReport> {
        let started_at = Instant::now();
        let result = connect(&self.path).and_then(|mut conn| ensure_schema(&mut conn));
        match result {
            Ok(report) => Some(report),
            Err(err) => {
                error!(
                    "event=ensure_schema module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                None
            }
        }
    }

    /// Appends a contact and returns its assigned id.
    ///
    /// Performs no validation; see [`crate::validation`].
    pub fn insert(&self, name: &str, phone: &str, email: Option<&str>) -> Option<ContactId> {
        let contact = NewContact {
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.map(str::to_string),
        };
        self.insert_contact(&contact)
    }

    pub fn insert_contact(&self, contact: &NewContact) -> Option<ContactId> {
        self.with_repo("contact_insert", |repo| repo.insert_contact(contact))
    }

    /// Lists contacts ordered by name, optionally filtered on name, phone or email.
    pub fn list(&self, filter: Option<&str>) -> Vec<Contact> {
        let query = filter.map_or_else(ContactListQuery::default, ContactListQuery::matching);
        self.list_with(&query)
    }

    pub fn list_with(&self, query: &ContactListQuery) -> Vec<Contact> {
        self.with_repo("contact_list", |repo| repo.list_contacts(query))
            .unwrap_or_default()
    }

    pub fn get(&self, id: ContactId) -> Option<Contact> {
        self.with_repo("contact_get", |repo| repo.get_contact(id))
            .flatten()
    }

    /// Overwrites name, phone and email; `false` when no row matched.
    pub fn update(&self, id: ContactId, name: &str, phone: &str, email: Option<&str>) -> bool {
        let contact = NewContact {
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.map(str::to_string),
        };
        self.update_contact(id, &contact)
    }

    pub fn update_contact(&self, id: ContactId, contact: &NewContact) -> bool {
        self.with_repo("contact_update", |repo| repo.update_contact(id, contact))
            .unwrap_or(false)
    }

    pub fn delete(&self, id: ContactId) -> bool {
        self.with_repo("contact_delete", |repo| repo.delete_contact(id))
            .unwrap_or(false)
    }

    /// Removes every contact whose name matches exactly.
    pub fn delete_by_name(&self, name: &str) -> bool {
        self.with_repo("contact_delete_by_name", |repo| {
            repo.delete_contacts_by_name(name)
        })
        .is_some_and(|removed| removed > 0)
    }

    pub fn count(&self) -> u64 {
        self.with_repo("contact_count", |repo| repo.count_contacts())
            .unwrap_or(0)
    }

    fn with_repo<T>(
        &self,
        event: &'static str,
        op: impl FnOnce(&SqliteContactRepository<'_>) -> RepoResult<T>,
    ) -> Option<T> {
        let started_at = Instant::now();
        let result = connect(&self.path)
            .map_err(RepoError::from)
            .and_then(|conn| op(&SqliteContactRepository::new(&conn)));

        match result {
            Ok(value) => {
                debug!(
                    "event={} module=store status=ok duration_ms={}",
                    event,
                    started_at.elapsed().as_millis()
                );
                Some(value)
            }
            Err(err) => {
                error!(
                    "event={} module=store status=error duration_ms={} error={}",
                    event,
                    started_at.elapsed().as_millis(),
                    err
                );
                None
            }
        }
    }
}
