//! Contact record and its storage text form.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Separator between fields in the serialized form.
const FIELD_SEPARATOR: char = ',';

/// Errors that can occur when serializing or parsing a [`Contact`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// A field was empty when serializing.
    #[error("contact field `{0}` cannot be empty")]
    EmptyField(&'static str),
    /// The serialized text did not contain all three fields.
    #[error("serialized contact must have 3 fields, found {found}")]
    MissingFields {
        /// Number of fields present in the input.
        found: usize,
    },
}

/// A name/phone/email record persisted in the key-value store.
///
/// The storage text form is `fullName,contactNumber,emailAddress`. Only the
/// first two commas separate fields, so the email part may contain commas.
///
/// ## Examples
///
/// ```
/// use pocketbook_core::Contact;
///
/// let contact = Contact::new("Ada Lovelace", "905-555-0199", "ada@example.com");
/// let text = contact.serialize().unwrap();
/// assert_eq!(text, "Ada Lovelace,905-555-0199,ada@example.com");
/// assert_eq!(Contact::deserialize(&text).unwrap(), contact);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub full_name: String,
    pub contact_number: String,
    pub email_address: String,
}

impl Contact {
    /// Create a contact from its three fields.
    #[must_use]
    pub fn new(
        full_name: impl Into<String>,
        contact_number: impl Into<String>,
        email_address: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            contact_number: contact_number.into(),
            email_address: email_address.into(),
        }
    }

    /// Serialize to the storage text form.
    ///
    /// # Errors
    ///
    /// Returns `ContactError::EmptyField` if any field is empty.
    pub fn serialize(&self) -> Result<String, ContactError> {
        if self.full_name.is_empty() {
            return Err(ContactError::EmptyField("fullName"));
        }
        if self.contact_number.is_empty() {
            return Err(ContactError::EmptyField("contactNumber"));
        }
        if self.email_address.is_empty() {
            return Err(ContactError::EmptyField("emailAddress"));
        }

        Ok(format!(
            "{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}",
            self.full_name, self.contact_number, self.email_address
        ))
    }

    /// Parse a contact from the storage text form.
    ///
    /// # Errors
    ///
    /// Returns `ContactError::MissingFields` if fewer than three fields are present.
    pub fn deserialize(data: &str) -> Result<Self, ContactError> {
        let mut parts = data.splitn(3, FIELD_SEPARATOR);

        match (parts.next(), parts.next(), parts.next()) {
            (Some(full_name), Some(contact_number), Some(email_address)) => {
                Ok(Self::new(full_name, contact_number, email_address))
            }
            (first, second, _) => Err(ContactError::MissingFields {
                found: usize::from(first.is_some()) + usize::from(second.is_some()),
            }),
        }
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <{}> {}",
            self.full_name, self.email_address, self.contact_number
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ada() -> Contact {
        Contact::new("Ada Lovelace", "905-555-0199", "ada@example.com")
    }

    #[test]
    fn test_serialize() {
        assert_eq!(
            ada().serialize().unwrap(),
            "Ada Lovelace,905-555-0199,ada@example.com"
        );
    }

    #[test]
    fn test_serialize_rejects_empty_fields() {
        let mut contact = ada();
        contact.contact_number.clear();
        assert_eq!(
            contact.serialize(),
            Err(ContactError::EmptyField("contactNumber"))
        );

        assert_eq!(
            Contact::default().serialize(),
            Err(ContactError::EmptyField("fullName"))
        );
    }

    #[test]
    fn test_deserialize_keeps_commas_in_email() {
        let contact = Contact::deserialize("Ada Lovelace,905-555-0199,a,b@example.com").unwrap();
        assert_eq!(contact.full_name, "Ada Lovelace");
        assert_eq!(contact.contact_number, "905-555-0199");
        assert_eq!(contact.email_address, "a,b@example.com");
    }

    #[test]
    fn test_deserialize_missing_fields() {
        assert_eq!(
            Contact::deserialize("Ada Lovelace"),
            Err(ContactError::MissingFields { found: 1 })
        );
        assert_eq!(
            Contact::deserialize("Ada Lovelace,905-555-0199"),
            Err(ContactError::MissingFields { found: 2 })
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ada().to_string(),
            "Ada Lovelace <ada@example.com> 905-555-0199"
        );
    }
}
