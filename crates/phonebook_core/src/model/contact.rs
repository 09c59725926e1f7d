//! Contact domain model.
//!
//! # Responsibility
//! - Define the stored contact record and its system-assigned identifier.
//! - Validate user input before it reaches SQL.
//! - Derive the "last name" sort key used for display ordering.
//!
//! # Invariants
//! - `id` is assigned by storage, increases monotonically and is never reused.
//! - Neither `name` nor `phone` may contain a line break, since the text
//!   mirror stores one contact per line.
//! - No other constraint applies: an empty name is a valid key and `phone`
//!   is free text with no format rule.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned contact identifier. Never shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub i64);

impl Display for ContactId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored name/phone record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    /// Unique, case-sensitive natural key.
    pub name: String,
    pub phone: String,
}

impl Contact {
    /// Renders the contact as one mirror line, without the trailing newline.
    pub fn mirror_line(&self) -> String {
        format!("{}: {}", self.name, self.phone)
    }
}

/// Which input field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Phone,
}

impl Display for ContactField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Phone => write!(f, "phone"),
        }
    }
}

/// Input rejected before any storage mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    LineBreak(ContactField),
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LineBreak(field) => write!(f, "contact {field} cannot contain line breaks"),
        }
    }
}

impl Error for ContactValidationError {}

/// Validates a name/phone pair prior to insertion.
pub fn validate_contact_input(name: &str, phone: &str) -> Result<(), ContactValidationError> {
    if has_line_break(name) {
        return Err(ContactValidationError::LineBreak(ContactField::Name));
    }
    if has_line_break(phone) {
        return Err(ContactValidationError::LineBreak(ContactField::Phone));
    }
    Ok(())
}

/// Returns the substring of `name` after its first space character.
///
/// Names without a space map to the empty string and therefore sort first.
/// Only the first space counts: `"Mary Ann Lee"` sorts under `"Ann Lee"`.
pub fn sort_key(name: &str) -> &str {
    name.split_once(' ').map_or("", |(_, rest)| rest)
}

fn has_line_break(value: &str) -> bool {
    value.contains(['\n', '\r'])
}

#[cfg(test)]
mod tests {
    use super::{
        sort_key, validate_contact_input, Contact, ContactField, ContactId,
        ContactValidationError,
    };

    #[test]
    fn sort_key_takes_text_after_first_space() {
        assert_eq!(sort_key("Alice Smith"), "Smith");
        assert_eq!(sort_key("Mary Ann Lee"), "Ann Lee");
        assert_eq!(sort_key("Trailing "), "");
    }

    #[test]
    fn sort_key_is_empty_without_space() {
        assert_eq!(sort_key("Carol"), "");
        assert_eq!(sort_key(""), "");
    }

    #[test]
    fn validation_rejects_line_breaks() {
        assert_eq!(
            validate_contact_input("Ann\nLee", "555"),
            Err(ContactValidationError::LineBreak(ContactField::Name))
        );
        assert_eq!(
            validate_contact_input("Ann Lee", "555\r1"),
            Err(ContactValidationError::LineBreak(ContactField::Phone))
        );
    }

    #[test]
    fn validation_accepts_free_text_phone() {
        assert!(validate_contact_input("Ann Lee", "call after 5pm, ext. 12").is_ok());
        assert!(validate_contact_input("Ann Lee", "").is_ok());
    }

    #[test]
    fn validation_accepts_empty_name() {
        assert!(validate_contact_input("", "555").is_ok());
    }

    #[test]
    fn contact_serializes_with_plain_integer_id() {
        let contact = Contact {
            id: ContactId(7),
            name: "Bob Jones".to_string(),
            phone: "555-0101".to_string(),
        };

        let value = serde_json::to_value(&contact).expect("contact should serialize");
        assert_eq!(
            value,
            serde_json::json!({ "id": 7, "name": "Bob Jones", "phone": "555-0101" })
        );
        assert_eq!(contact.mirror_line(), "Bob Jones: 555-0101");
    }
}
