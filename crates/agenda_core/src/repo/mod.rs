//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define data access contracts for the contact table.
//! - Isolate SQLite query details from the store and service.
//!
//! # Invariants
//! - Repository APIs propagate storage errors; the store decides how to
//!   surface them.

pub mod contact_repo;
