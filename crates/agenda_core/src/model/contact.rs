//! Contact record and write payload.
//!
//! # Invariants
//! - `id` is assigned by SQLite on insert and never changes afterwards.
//! - `name` and `phone` are non-empty for every record written through
//!   `ContactService`; the raw store accepts whatever it is given.
//! - `email` is `None` rather than an empty string.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned primary key of a contact row.
pub type ContactId = i64;

/// One persisted contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

impl Contact {
    /// Returns the uppercased first letters of the first two name words.
    ///
    /// Falls back to `"NN"` when the name has no words.
    pub fn initials(&self) -> String {
        let mut words = self.name.split_whitespace();
        let Some(first) = words.next() else {
            return "NN".to_string();
        };

        let mut initials = String::new();
        for word in std::iter::once(first).chain(words.take(1)) {
            if let Some(letter) = word.chars().next() {
                initials.extend(letter.to_uppercase());
            }
        }
        initials
    }
}

impl Display for Contact {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[id:{}] {} - {} - {}",
            self.id,
            self.name,
            self.phone,
            self.email.as_deref().unwrap_or("-")
        )
    }
}

/// Field payload for insert and update; the id is never part of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

impl NewContact {
    /// Builds a payload from raw form input.
    ///
    /// Fields are trimmed and a blank email becomes `None`.
    pub fn from_input(name: &str, phone: &str, email: &str) -> Self {
        let email = email.trim();
        Self {
            name: name.trim().to_string(),
            phone: phone.trim().to_string(),
            email: (!email.is_empty()).then(|| email.to_string()),
        }
    }
}
