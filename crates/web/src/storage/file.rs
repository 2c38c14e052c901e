//! File-backed storage backend.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::PathBuf;

use super::{KeyValueStore, StorageError};

/// Key-value storage persisted as one JSON object.
///
/// Nothing is cached between calls: reads parse the current file and every
/// mutation is a read-modify-write of the whole map. Mutations hold an
/// exclusive lock on a sibling `.lock` file, so several handles on the same
/// path (the web server and the CLI, say) never lose each other's writes.
/// Writes go to a sibling temporary file first and are renamed into place,
/// so readers see either the old or the new contents and a crash mid-write
/// leaves the previous contents intact.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
}

/// Exclusive hold on the store's lock file, released when dropped.
struct WriteGuard {
    _file: File,
}

impl FileStorage {
    /// Open the store at `path`, starting empty if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let storage = Self { path: path.into() };

        if !storage.path.exists() {
            tracing::info!(path = %storage.path.display(), "Storage file not found, starting empty");
        }
        storage.load()?;

        Ok(storage)
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(suffix);
        PathBuf::from(name)
    }

    fn lock(&self) -> Result<WriteGuard, StorageError> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.sibling(".lock"))?;
        file.lock()?;
        Ok(WriteGuard { _file: file })
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.sibling(".tmp");

        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock()?;

        let mut entries = self.load()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock()?;

        let mut entries = self.load()?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&entries)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.load()?.into_keys().collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;

    struct TempStore {
        path: PathBuf,
    }

    impl TempStore {
        fn new() -> Self {
            Self {
                path: std::env::temp_dir()
                    .join(format!("pocketbook-store-{}.json", uuid::Uuid::new_v4())),
            }
        }

        fn open(&self) -> FileStorage {
            FileStorage::open(&self.path).unwrap()
        }
    }

    impl Drop for TempStore {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
            let mut lock = OsString::from(self.path.as_os_str());
            lock.push(".lock");
            let _ = std::fs::remove_file(PathBuf::from(lock));
        }
    }

    #[test]
    fn test_open_missing_file_starts_empty() {
        let temp = TempStore::new();
        let storage = temp.open();
        assert!(storage.keys().unwrap().is_empty());
        assert!(!temp.path.exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp = TempStore::new();
        {
            let storage = temp.open();
            storage.set("contact_1", "Ada Lovelace,905-555-0199,ada@example.com").unwrap();
            storage.set("contact_2", "Alan Turing,905-555-0100,alan@example.com").unwrap();
            storage.remove("contact_2").unwrap();
        }

        let reopened = temp.open();
        assert_eq!(reopened.keys().unwrap(), vec!["contact_1".to_string()]);
        assert_eq!(
            reopened.get("contact_1").unwrap().as_deref(),
            Some("Ada Lovelace,905-555-0199,ada@example.com")
        );
    }

    #[test]
    fn test_open_corrupt_file_fails() {
        let temp = TempStore::new();
        std::fs::write(&temp.path, "[1, 2, 3]").unwrap();

        assert!(matches!(
            FileStorage::open(&temp.path),
            Err(StorageError::Corrupt(_))
        ));
    }

    #[test]
    fn test_remove_missing_key_does_not_write() {
        let temp = TempStore::new();
        let storage = temp.open();

        storage.remove("contact_404").unwrap();
        assert!(!temp.path.exists());
    }

    #[test]
    fn test_two_handles_keep_each_others_writes() {
        let temp = TempStore::new();
        let cli = temp.open();
        let web = temp.open();

        cli.set("contact_1", "Ada Lovelace,905-555-0199,ada@example.com").unwrap();
        web.set("contact_2", "Alan Turing,905-555-0100,alan@example.com").unwrap();
        assert_eq!(
            web.keys().unwrap(),
            vec!["contact_1".to_string(), "contact_2".to_string()]
        );

        cli.remove("contact_2").unwrap();
        assert_eq!(web.get("contact_2").unwrap(), None);

        let reopened = temp.open();
        assert_eq!(reopened.keys().unwrap(), vec!["contact_1".to_string()]);
    }

    #[test]
    fn test_concurrent_writers_lose_nothing() {
        let temp = TempStore::new();
        let handles: Vec<Arc<FileStorage>> = (0..4).map(|_| Arc::new(temp.open())).collect();

        let threads: Vec<_> = handles
            .iter()
            .enumerate()
            .map(|(h, storage)| {
                let storage = Arc::clone(storage);
                std::thread::spawn(move || {
                    for i in 0..10 {
                        storage.set(&format!("contact_{h}{i:02}"), "x").unwrap();
                    }
                })
            })
            .collect();
        for thread in threads {
            thread.join().unwrap();
        }

        assert_eq!(temp.open().keys().unwrap().len(), 40);
    }
}
