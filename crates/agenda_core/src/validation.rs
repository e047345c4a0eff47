//! Field-format predicates applied before anything reaches the store.
//!
//! # Responsibility
//! - Decide whether a candidate name, phone or email is acceptable.
//! - Give every front end the same rules and the same rejection messages.
//!
//! # Invariants
//! - Predicates are pure: one string in, one boolean out, no side effects.
//! - The store never validates; callers go through this module first.

use crate::model::contact::NewContact;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

// Latin-1 letters without the multiplication (U+00D7) and division (U+00F7) signs.
static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-zÀ-ÖØ-öø-ÿ\s]{2,}$").expect("valid name regex")
});
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("valid phone regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\w.-]+@[\w.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

/// Field rejected by [`validate_contact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    InvalidName,
    InvalidPhone,
    InvalidEmail,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "invalid name"),
            Self::InvalidPhone => write!(f, "invalid phone"),
            Self::InvalidEmail => write!(f, "invalid email"),
        }
    }
}

impl Error for ValidationError {}

/// Letters (accents and ñ/Ñ included) and whitespace, at least two characters.
pub fn validate_name(name: &str) -> bool {
    !name.trim().is_empty() && NAME_RE.is_match(name)
}

/// Optional leading `+` followed by 7 to 15 ASCII digits.
pub fn validate_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// `local@domain.tld` with word/dot/hyphen segments and a 2+ letter tld.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Checks every field of a payload, reporting the first rejected one.
///
/// Email is only checked when present.
pub fn validate_contact(contact: &NewContact) -> Result<(), ValidationError> {
    if !validate_name(&contact.name) {
        return Err(ValidationError::InvalidName);
    }
    if !validate_phone(&contact.phone) {
        return Err(ValidationError::InvalidPhone);
    }
    if let Some(email) = contact.email.as_deref() {
        if !validate_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
    }
    Ok(())
}
