//! Core types for Pocketbook.
//!
//! This module provides type-safe wrappers for the contact-book domain.

pub mod contact;
pub mod key;
pub mod session;
pub mod validation;

pub use contact::{Contact, ContactError};
pub use key::{CONTACT_KEY_PREFIX, ContactKey, ContactKeyError};
pub use session::SessionUser;
pub use validation::{ContactForm, Field, FieldStatus, FormErrors, REQUIRED_MESSAGE, Rule};
