//! Contact store management commands.
//!
//! # Usage
//!
//! ```bash
//! pocketbook contacts list
//! pocketbook contacts show contact_1700000000000
//! pocketbook contacts add -n "Ada Lovelace" -p 905-555-0199 -e ada@example.com
//! pocketbook contacts remove contact_1700000000000
//! ```
//!
//! # Environment Variables
//!
//! - `POCKETBOOK_STORE_PATH` - JSON file backing the contact store, used when
//!   `--store` is not given

use std::path::PathBuf;

use pocketbook_core::{Contact, ContactKey, ContactKeyError};
use pocketbook_web::contacts::{ContactStore, ContactStoreError, ListedContact};
use pocketbook_web::storage::{FileStorage, StorageError};
use thiserror::Error;

/// Errors that can occur during contact operations.
#[derive(Debug, Error)]
pub enum ContactsError {
    /// No store path on the command line or in the environment.
    #[error("No contact store given. Pass --store or set POCKETBOOK_STORE_PATH")]
    MissingStore,

    /// The store file could not be opened.
    #[error("Failed to open contact store: {0}")]
    Storage(#[from] StorageError),

    /// A contact store operation failed.
    #[error("Contact store error: {0}")]
    Store(#[from] ContactStoreError),

    /// The key is not a contact key.
    #[error("Invalid contact key: {0}")]
    InvalidKey(#[from] ContactKeyError),

    /// No contact is stored under the key.
    #[error("No contact stored under {0}")]
    NotFound(ContactKey),
}

/// Resolve the store path from the flag or `POCKETBOOK_STORE_PATH`.
///
/// # Errors
///
/// Returns `ContactsError::MissingStore` when neither is set.
pub fn store_path(flag: Option<PathBuf>) -> Result<PathBuf, ContactsError> {
    dotenvy::dotenv().ok();

    flag.or_else(|| {
        std::env::var_os("POCKETBOOK_STORE_PATH")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    })
    .ok_or(ContactsError::MissingStore)
}

/// List every stored contact.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn list(path: PathBuf) -> Result<Vec<ListedContact>, ContactsError> {
    let storage = FileStorage::open(path)?;
    let listed = ContactStore::new(&storage).list()?;

    if listed.is_empty() {
        tracing::info!("No contacts stored");
    }
    for row in &listed {
        tracing::info!("{}. {} [{}]", row.index, row.contact, row.key);
    }

    Ok(listed)
}

/// Show the contact stored under `key`.
///
/// # Errors
///
/// Returns an error if the key is invalid, nothing is stored under it, or
/// the store cannot be read.
pub fn show(path: PathBuf, key: &str) -> Result<Contact, ContactsError> {
    let key = ContactKey::parse(key)?;
    let storage = FileStorage::open(path)?;

    let contact = ContactStore::new(&storage)
        .get(&key)?
        .ok_or(ContactsError::NotFound(key))?;

    tracing::info!("Full name:      {}", contact.full_name);
    tracing::info!("Contact number: {}", contact.contact_number);
    tracing::info!("Email address:  {}", contact.email_address);

    Ok(contact)
}

/// Validate and add a contact.
///
/// # Errors
///
/// Returns an error if a field fails validation or the store cannot be written.
pub fn add(path: PathBuf, contact: &Contact) -> Result<ContactKey, ContactsError> {
    let storage = FileStorage::open(path)?;

    match ContactStore::new(&storage).add(contact) {
        Ok(key) => {
            tracing::info!("Contact added under {}", key);
            Ok(key)
        }
        Err(ContactStoreError::Invalid(errors)) => {
            for field in errors.failed() {
                if let Some(message) = errors.message(field) {
                    tracing::error!("{field}: {message}");
                }
            }
            Err(ContactStoreError::Invalid(errors).into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Remove the contact stored under `key`. Missing keys are not an error.
///
/// # Errors
///
/// Returns an error if the key is invalid or the store cannot be written.
pub fn remove(path: PathBuf, key: &str) -> Result<(), ContactsError> {
    let key = ContactKey::parse(key)?;
    let storage = FileStorage::open(path)?;

    ContactStore::new(&storage).remove(&key)?;
    tracing::info!("Contact {} removed", key);

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_store() -> PathBuf {
        std::env::temp_dir().join(format!("pocketbook-cli-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_add_show_remove() {
        let path = temp_store();
        let ada = Contact::new("Ada Lovelace", "905-555-0199", "ada@example.com");

        let key = add(path.clone(), &ada).unwrap();
        assert_eq!(show(path.clone(), key.as_str()).unwrap(), ada);
        assert_eq!(list(path.clone()).unwrap().len(), 1);

        remove(path.clone(), key.as_str()).unwrap();
        assert!(matches!(
            show(path.clone(), key.as_str()),
            Err(ContactsError::NotFound(_))
        ));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_add_rejects_invalid_contact() {
        let path = temp_store();
        let bad = Contact::new("Ada Lovelace", "905 555 0199", "ada@example.com");

        assert!(matches!(
            add(path.clone(), &bad),
            Err(ContactsError::Store(ContactStoreError::Invalid(_)))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_rejects_foreign_key() {
        assert!(matches!(
            remove(temp_store(), "theme"),
            Err(ContactsError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_store_path_prefers_flag() {
        let flag = PathBuf::from("/tmp/contacts.json");
        assert_eq!(store_path(Some(flag.clone())).unwrap(), flag);
    }
}
