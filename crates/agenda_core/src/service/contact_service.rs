//! Contact use-case service.
//!
//! # Responsibility
//! - Normalize raw form input, validate it, then delegate to the store.
//! - Give front ends one typed outcome per use case.
//!
//! # Invariants
//! - Nothing reaches `ContactStore` writes without passing `validate_contact`.
//! - Store failures and missing rows are reported, never panicked on.

use crate::model::contact::{Contact, ContactId, NewContact};
use crate::store::ContactStore;
use crate::validation::{validate_contact, ValidationError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Use-case level failure surfaced to front ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    Validation(ValidationError),
    /// The id matched no row, or the store could not complete the write.
    NotFound(ContactId),
    /// The store could not complete the insert; details are in the log.
    Storage,
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
            Self::Storage => write!(f, "contact could not be saved"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) | Self::Storage => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Validating wrapper over a [`ContactStore`].
pub struct ContactService {
    store: ContactStore,
}

impl ContactService {
    pub fn new(store: ContactStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ContactStore {
        &self.store
    }

    /// Creates a contact from raw input and returns its id.
    pub fn create(&self, name: &str, phone: &str, email: &str) -> ServiceResult<ContactId> {
        self.create_contact(&NewContact::from_input(name, phone, email))
    }

    pub fn create_contact(&self, contact: &NewContact) -> ServiceResult<ContactId> {
        validate_contact(contact)?;
        let id = self
            .store
            .insert_contact(contact)
            .ok_or(ServiceError::Storage)?;
        info!("event=contact_create module=service status=ok id={id}");
        Ok(id)
    }

    /// Replaces all fields of an existing contact with raw input.
    pub fn update(&self, id: ContactId, name: &str, phone: &str, email: &str) -> ServiceResult<()> {
        self.update_contact(id, &NewContact::from_input(name, phone, email))
    }

    pub fn update_contact(&self, id: ContactId, contact: &NewContact) -> ServiceResult<()> {
        validate_contact(contact)?;
        if !self.store.update_contact(id, contact) {
            return Err(ServiceError::NotFound(id));
        }
        info!("event=contact_update module=service status=ok id={id}");
        Ok(())
    }

    pub fn delete(&self, id: ContactId) -> ServiceResult<()> {
        if !self.store.delete(id) {
            return Err(ServiceError::NotFound(id));
        }
        info!("event=contact_delete module=service status=ok id={id}");
        Ok(())
    }

    pub fn get(&self, id: ContactId) -> Option<Contact> {
        self.store.get(id)
    }

    pub fn list(&self, filter: Option<&str>) -> Vec<Contact> {
        self.store.list(filter)
    }
}
