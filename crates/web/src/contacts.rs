//! Contact persistence over the key-value store.
//!
//! Contacts live under `contact_<timestamp>` keys in their comma-separated
//! text form. Any other key in the store belongs to something else and is
//! skipped when listing.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::instrument;

use pocketbook_core::{Contact, ContactError, ContactForm, ContactKey, ContactKeyError, FormErrors};

use crate::storage::{KeyValueStore, StorageError};

/// Errors that can occur in contact store operations.
#[derive(Debug, Error)]
pub enum ContactStoreError {
    /// The storage backend failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A stored record could not be read back, or a contact could not be written.
    #[error("contact error: {0}")]
    Contact(#[from] ContactError),

    /// No key could be minted for a new contact.
    #[error("contact key error: {0}")]
    Key(#[from] ContactKeyError),

    /// The contact did not pass field validation and was not persisted.
    #[error("contact failed validation")]
    Invalid(FormErrors),
}

/// A contact as shown in the list, numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedContact {
    pub index: usize,
    pub key: String,
    pub contact: Contact,
}

/// CRUD operations for contacts.
pub struct ContactStore<'a> {
    storage: &'a dyn KeyValueStore,
}

impl<'a> ContactStore<'a> {
    /// Create a contact store over `storage`.
    #[must_use]
    pub const fn new(storage: &'a dyn KeyValueStore) -> Self {
        Self { storage }
    }

    /// Validate and store a new contact under a freshly minted key.
    ///
    /// # Errors
    ///
    /// Returns `ContactStoreError::Invalid` if any field fails validation, or a
    /// storage error if the write fails.
    pub fn add(&self, contact: &Contact) -> Result<ContactKey, ContactStoreError> {
        self.add_at(contact, Utc::now())
    }

    /// Like [`add`](Self::add), minting the key from `now`.
    ///
    /// # Errors
    ///
    /// See [`add`](Self::add).
    #[instrument(skip(self, contact))]
    pub fn add_at(
        &self,
        contact: &Contact,
        now: DateTime<Utc>,
    ) -> Result<ContactKey, ContactStoreError> {
        let text = validated_text(contact)?;

        let key = ContactKey::mint(now, |candidate| {
            self.storage
                .contains(candidate.as_str())
                .map_err(ContactStoreError::from)
        })?;
        self.storage.set(key.as_str(), &text)?;

        tracing::info!(key = %key, "Contact added");
        Ok(key)
    }

    /// Load the contact stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails or the stored text is malformed.
    pub fn get(&self, key: &ContactKey) -> Result<Option<Contact>, ContactStoreError> {
        match self.storage.get(key.as_str())? {
            Some(data) => Ok(Some(Contact::deserialize(&data)?)),
            None => Ok(None),
        }
    }

    /// Validate and overwrite the contact under an existing key.
    ///
    /// # Errors
    ///
    /// Returns `ContactStoreError::Invalid` if any field fails validation, or a
    /// storage error if the write fails.
    #[instrument(skip(self, key, contact), fields(key = %key))]
    pub fn update(&self, key: &ContactKey, contact: &Contact) -> Result<(), ContactStoreError> {
        let text = validated_text(contact)?;
        self.storage.set(key.as_str(), &text)?;

        tracing::info!("Contact updated");
        Ok(())
    }

    /// Remove the contact under `key`. Missing keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the removal fails.
    #[instrument(skip(self, key), fields(key = %key))]
    pub fn remove(&self, key: &ContactKey) -> Result<(), ContactStoreError> {
        self.storage.remove(key.as_str())?;

        tracing::info!("Contact removed");
        Ok(())
    }

    /// Every stored contact, numbered in creation order. Keys without a
    /// timestamp come first.
    ///
    /// Keys without the `contact_` prefix are skipped with a warning; records
    /// that fail to deserialize are skipped with an error log.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the keys cannot be enumerated.
    pub fn list(&self) -> Result<Vec<ListedContact>, ContactStoreError> {
        let mut found = Vec::new();

        for raw in self.storage.keys()? {
            let Ok(key) = ContactKey::parse(&raw) else {
                tracing::warn!(key = %raw, "Skipping non-contact key");
                continue;
            };

            let Some(data) = self.storage.get(&raw)? else {
                continue;
            };

            match Contact::deserialize(&data) {
                Ok(contact) => found.push((key, contact)),
                Err(e) => tracing::error!(key = %raw, error = %e, "Error deserializing contact data"),
            }
        }

        found.sort_by(|(a, _), (b, _)| a.cmp(b));

        Ok(found
            .into_iter()
            .enumerate()
            .map(|(i, (key, contact))| ListedContact {
                index: i + 1,
                key: key.into(),
                contact,
            })
            .collect())
    }
}

/// Validate a contact and produce its storage text.
fn validated_text(contact: &Contact) -> Result<String, ContactStoreError> {
    ContactForm::from(contact)
        .validate()
        .map_err(ContactStoreError::Invalid)?;
    Ok(contact.serialize()?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use pocketbook_core::Field;

    use super::*;
    use crate::storage::MemoryStorage;

    fn ada() -> Contact {
        Contact::new("Ada Lovelace", "905-555-0199", "ada@example.com")
    }

    fn alan() -> Contact {
        Contact::new("Alan Turing", "905-555-0100", "alan@example.com")
    }

    #[test]
    fn test_add_round_trips() {
        let storage = MemoryStorage::new();
        let store = ContactStore::new(&storage);

        let key = store.add(&ada()).unwrap();
        assert!(key.as_str().starts_with("contact_"));
        assert_eq!(store.get(&key).unwrap(), Some(ada()));
    }

    #[test]
    fn test_add_in_same_millisecond_gets_distinct_keys() {
        let storage = MemoryStorage::new();
        let store = ContactStore::new(&storage);
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();

        let first = store.add_at(&ada(), now).unwrap();
        let second = store.add_at(&alan(), now).unwrap();

        assert_ne!(first, second);
        assert_eq!(store.get(&first).unwrap(), Some(ada()));
        assert_eq!(store.get(&second).unwrap(), Some(alan()));
    }

    #[test]
    fn test_add_rejects_invalid_contact() {
        let storage = MemoryStorage::new();
        let store = ContactStore::new(&storage);

        let bad = Contact::new("Ada Lovelace", "9055550199", "ada@example.com");
        let Err(ContactStoreError::Invalid(errors)) = store.add(&bad) else {
            panic!("expected validation failure");
        };
        assert_eq!(
            errors.message(Field::ContactNumber),
            Some("Contact Number must be in format ###-###-####")
        );
        assert!(storage.keys().unwrap().is_empty());
    }

    #[test]
    fn test_update_preserves_key() {
        let storage = MemoryStorage::new();
        let store = ContactStore::new(&storage);
        let key = store.add(&ada()).unwrap();

        let mut edited = ada();
        edited.email_address = "countess@example.com".to_string();
        store.update(&key, &edited).unwrap();

        assert_eq!(store.get(&key).unwrap(), Some(edited));
        assert_eq!(storage.keys().unwrap(), vec![key.to_string()]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let storage = MemoryStorage::new();
        let store = ContactStore::new(&storage);
        let key = store.add(&ada()).unwrap();

        store.remove(&ContactKey::from_timestamp(1)).unwrap();
        assert_eq!(store.get(&key).unwrap(), Some(ada()));

        store.remove(&key).unwrap();
        store.remove(&key).unwrap();
        assert_eq!(store.get(&key).unwrap(), None);
    }

    #[test]
    fn test_delete_one_of_two() {
        let storage = MemoryStorage::new();
        storage.set("contact_1", &ada().serialize().unwrap()).unwrap();
        storage.set("contact_2", &alan().serialize().unwrap()).unwrap();
        let store = ContactStore::new(&storage);

        store.remove(&ContactKey::parse("contact_1").unwrap()).unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].key, "contact_2");
        assert_eq!(listed[0].contact, alan());
    }

    #[test]
    fn test_list_numbers_rows_and_skips_foreign_keys() {
        let storage = MemoryStorage::new();
        storage.set("contact_10", &ada().serialize().unwrap()).unwrap();
        storage.set("contact_20", "garbage").unwrap();
        storage.set("contact_30", &alan().serialize().unwrap()).unwrap();
        storage.set("theme", "dark").unwrap();
        let store = ContactStore::new(&storage);

        let listed = store.list().unwrap();
        let rows: Vec<(usize, &str)> = listed.iter().map(|c| (c.index, c.key.as_str())).collect();
        assert_eq!(rows, vec![(1, "contact_10"), (2, "contact_30")]);
    }

    #[test]
    fn test_list_orders_by_timestamp() {
        let storage = MemoryStorage::new();
        storage.set("contact_1000", &alan().serialize().unwrap()).unwrap();
        storage.set("contact_999", &ada().serialize().unwrap()).unwrap();
        storage.set("contact_abc", &ada().serialize().unwrap()).unwrap();
        let store = ContactStore::new(&storage);

        let keys: Vec<String> = store.list().unwrap().into_iter().map(|c| c.key).collect();
        assert_eq!(keys, vec!["contact_abc", "contact_999", "contact_1000"]);
    }

    struct BrokenStorage;

    impl KeyValueStore for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Poisoned)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Poisoned)
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Poisoned)
        }

        fn keys(&self) -> Result<Vec<String>, StorageError> {
            Err(StorageError::Poisoned)
        }
    }

    #[test]
    fn test_add_reports_storage_failure() {
        let store = ContactStore::new(&BrokenStorage);

        assert!(matches!(
            store.add(&ada()),
            Err(ContactStoreError::Storage(StorageError::Poisoned))
        ));
    }
}
