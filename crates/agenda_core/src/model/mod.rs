//! Contact domain model.
//!
//! # Responsibility
//! - Define the contact record shared by the store, service and front ends.
//!
//! # Invariants
//! - Every persisted contact is identified by a store-assigned `ContactId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod contact;
