//! Person domain model.
//!
//! # Responsibility
//! - Define the top-level record owning a list of credit-card accounts.
//! - Validate user-entered person fields before persistence.
//!
//! # Invariants
//! - `id` is stable and never reused for another person.
//! - `cards` keeps insertion order; storage mirrors it on reload.
//! - `email`, when present, is non-empty and shaped like an address.

use crate::model::card::CreditCardAccount;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a person record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type PersonId = Uuid;

// Intentionally loose: the address is contact metadata, not a delivery
// target, so only the basic local@domain.tld shape is enforced.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Validation failure for person fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    /// The nil UUID is reserved and never a valid identity.
    NilUuid,
    /// Display name is empty after trimming.
    EmptyName,
    /// Contact email is present but not shaped like an address.
    InvalidEmail(String),
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilUuid => write!(f, "person id must not be the nil uuid"),
            Self::EmptyName => write!(f, "person name must not be empty"),
            Self::InvalidEmail(value) => write!(f, "invalid contact email: `{value}`"),
        }
    }
}

impl Error for PersonValidationError {}

/// A household member who owns zero or more credit-card accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Stable global ID used for ownership links and targeted actions.
    pub id: PersonId,
    /// Display name shown on the dashboard.
    pub name: String,
    /// Optional contact email; informational only, nothing is sent to it.
    pub email: Option<String>,
    /// Cards owned by this person, in creation order.
    #[serde(default)]
    pub cards: Vec<CreditCardAccount>,
}

impl Person {
    /// Creates a new person with a generated stable ID and no cards.
    pub fn new(name: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email,
            cards: Vec::new(),
        }
    }

    /// Creates a person with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(
        id: PersonId,
        name: impl Into<String>,
        email: Option<String>,
    ) -> Result<Self, PersonValidationError> {
        if id.is_nil() {
            return Err(PersonValidationError::NilUuid);
        }
        let mut person = Self::new(name, email);
        person.id = id;
        Ok(person)
    }

    /// Checks person-level invariants.
    ///
    /// Card-level invariants are validated per card by the persistence
    /// layer; this only covers the person's own fields.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if self.id.is_nil() {
            return Err(PersonValidationError::NilUuid);
        }
        if self.name.trim().is_empty() {
            return Err(PersonValidationError::EmptyName);
        }
        if let Some(email) = &self.email {
            if !EMAIL_RE.is_match(email.trim()) {
                return Err(PersonValidationError::InvalidEmail(email.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Person, PersonValidationError};
    use uuid::Uuid;

    #[test]
    fn new_person_starts_without_cards() {
        let person = Person::new("Avery Chen", None);
        assert!(!person.id.is_nil());
        assert!(person.cards.is_empty());
        assert!(person.validate().is_ok());
    }

    #[test]
    fn with_id_rejects_nil_uuid() {
        let err = Person::with_id(Uuid::nil(), "Avery", None).unwrap_err();
        assert_eq!(err, PersonValidationError::NilUuid);
    }

    #[test]
    fn validate_rejects_blank_name() {
        let person = Person::new("   ", None);
        assert_eq!(person.validate(), Err(PersonValidationError::EmptyName));
    }

    #[test]
    fn validate_rejects_malformed_email() {
        let person = Person::new("Avery", Some("not-an-address".to_string()));
        assert!(matches!(
            person.validate(),
            Err(PersonValidationError::InvalidEmail(_))
        ));

        let person = Person::new("Avery", Some("avery@example.com".to_string()));
        assert!(person.validate().is_ok());
    }
}
