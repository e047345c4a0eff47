//! Core use-case services.
//!
//! # Responsibility
//! - Put validation in front of every store write.
//! - Keep front ends decoupled from storage details.

pub mod contact_service;
