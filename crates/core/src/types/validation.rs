//! Field-level validation rules for contact forms.
//!
//! Each form field has one regex rule. A field that is empty after trimming
//! reports [`REQUIRED_MESSAGE`]; a field that does not match its rule reports
//! the rule's message; anything else is valid. A form is valid only when every
//! field is.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::contact::Contact;

/// Message shown for a field left empty.
pub const REQUIRED_MESSAGE: &str = "The field is required";

/// A regex rule with the message shown when it does not match.
#[derive(Debug)]
pub struct Rule {
    regex: Regex,
    message: &'static str,
}

impl Rule {
    fn new(pattern: &str, message: &'static str) -> Self {
        Self {
            regex: Regex::new(pattern).expect("Invalid validation regex"),
            message,
        }
    }

    /// Returns true if `value` satisfies the rule.
    #[must_use]
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// Message displayed when the rule fails.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.message
    }
}

static FULL_NAME_RULE: LazyLock<Rule> = LazyLock::new(|| {
    Rule::new(
        r"^[A-Za-z\s]+$",
        "Full name must only contain letters and spaces.",
    )
});

// `\d` matches any Unicode digit; contact numbers are ASCII only.
static CONTACT_NUMBER_RULE: LazyLock<Rule> = LazyLock::new(|| {
    Rule::new(
        r"^[0-9]{3}-[0-9]{3}-[0-9]{4}$",
        "Contact Number must be in format ###-###-####",
    )
});

static EMAIL_ADDRESS_RULE: LazyLock<Rule> = LazyLock::new(|| {
    Rule::new(
        r"^[^\s@]+@[^\s@]+\.[^\s@]+$",
        "Email address must be a valid email address",
    )
});

/// A validated contact form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FullName,
    ContactNumber,
    EmailAddress,
}

impl Field {
    /// Every field, in form order.
    pub const ALL: [Self; 3] = [Self::FullName, Self::ContactNumber, Self::EmailAddress];

    /// The form field id (also the form parameter name).
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::ContactNumber => "contactNumber",
            Self::EmailAddress => "emailAddress",
        }
    }

    /// The regex rule for this field.
    #[must_use]
    pub fn rule(self) -> &'static Rule {
        match self {
            Self::FullName => &*FULL_NAME_RULE,
            Self::ContactNumber => &*CONTACT_NUMBER_RULE,
            Self::EmailAddress => &*EMAIL_ADDRESS_RULE,
        }
    }

    /// Validate a single input value.
    #[must_use]
    pub fn validate(self, value: &str) -> FieldStatus {
        if value.trim().is_empty() {
            return FieldStatus::Required;
        }

        let rule = self.rule();
        if rule.is_match(value) {
            FieldStatus::Valid
        } else {
            FieldStatus::Invalid(rule.message())
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Outcome of validating one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    Valid,
    Required,
    Invalid(&'static str),
}

impl FieldStatus {
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Inline error text, or `None` when the field is valid.
    #[must_use]
    pub const fn message(self) -> Option<&'static str> {
        match self {
            Self::Valid => None,
            Self::Required => Some(REQUIRED_MESSAGE),
            Self::Invalid(message) => Some(message),
        }
    }
}

/// Raw contact form input, named after the form field ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub email_address: String,
}

impl ContactForm {
    /// The raw value entered for `field`.
    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::FullName => &self.full_name,
            Field::ContactNumber => &self.contact_number,
            Field::EmailAddress => &self.email_address,
        }
    }

    /// Validate every field and build a [`Contact`] when all pass.
    ///
    /// All fields are evaluated so every inline error can be shown at once.
    ///
    /// # Errors
    ///
    /// Returns the per-field statuses when at least one field fails.
    pub fn validate(&self) -> Result<Contact, FormErrors> {
        let errors = FormErrors {
            full_name: Field::FullName.validate(&self.full_name),
            contact_number: Field::ContactNumber.validate(&self.contact_number),
            email_address: Field::EmailAddress.validate(&self.email_address),
        };

        if errors.is_empty() {
            Ok(Contact::new(
                self.full_name.clone(),
                self.contact_number.clone(),
                self.email_address.clone(),
            ))
        } else {
            Err(errors)
        }
    }
}

impl From<&Contact> for ContactForm {
    fn from(contact: &Contact) -> Self {
        Self {
            full_name: contact.full_name.clone(),
            contact_number: contact.contact_number.clone(),
            email_address: contact.email_address.clone(),
        }
    }
}

/// Per-field validation results for a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormErrors {
    full_name: FieldStatus,
    contact_number: FieldStatus,
    email_address: FieldStatus,
}

impl FormErrors {
    /// Status of a single field.
    #[must_use]
    pub const fn status(&self, field: Field) -> FieldStatus {
        match field {
            Field::FullName => self.full_name,
            Field::ContactNumber => self.contact_number,
            Field::EmailAddress => self.email_address,
        }
    }

    /// Inline error text for `field`, if it failed.
    #[must_use]
    pub const fn message(&self, field: Field) -> Option<&'static str> {
        self.status(field).message()
    }

    /// Returns true when no field failed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.full_name.is_valid() && self.contact_number.is_valid() && self.email_address.is_valid()
    }

    /// The fields that failed, in form order.
    pub fn failed(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL
            .into_iter()
            .filter(|field| !self.status(*field).is_valid())
    }
}
