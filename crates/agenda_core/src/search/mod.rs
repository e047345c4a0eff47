//! In-memory lookups over an already loaded contact list.
//!
//! # Invariants
//! - Search APIs never touch storage; callers load the list first.

pub mod agenda;
