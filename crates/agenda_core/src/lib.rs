//! Core domain logic for the contact agenda.
//! This crate is the single source of truth for contact invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod store;
pub mod validation;

pub use db::{DbError, DbResult, SchemaReport};
pub use logging::{init_logging, logging_status, LogLevel};
pub use model::contact::{Contact, ContactId, NewContact};
pub use repo::contact_repo::{
    ContactListQuery, ContactRepository, FilterScope, RepoError, RepoResult,
    SqliteContactRepository,
};
pub use search::agenda::Agenda;
pub use service::contact_service::{ContactService, ServiceError, ServiceResult};
pub use store::ContactStore;
pub use validation::{
    validate_contact, validate_email, validate_name, validate_phone, ValidationError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
