// src/storage.rs
use crate::error::{StorageError, StorageResult};
use crate::models::Validate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub const USER_KEY: &str = "movieapp_user";
pub const WATCH_HISTORY_KEY: &str = "movieapp_watchhistory";
pub const SAVED_MOVIES_KEY: &str = "movieapp_savedmovies";

pub const ALL_KEYS: [&str; 3] = [USER_KEY, WATCH_HISTORY_KEY, SAVED_MOVIES_KEY];

// Stored texts that mean "nothing here".
const ABSENT_SENTINELS: [&str; 2] = ["undefined", "null"];

/// String-keyed persistent store. Values are opaque text; callers decide the
/// encoding.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()>;
    fn remove_item(&mut self, key: &str) -> StorageResult<()>;
}

/// Keeps each key in its own `<key>.json` file inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                log::error!("Failed to read {:?}: {:?}", path, e);
                Err(StorageError::Io(e))
            }
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| {
                log::error!("Failed to create data directory {:?}: {:?}", self.dir, e);
                StorageError::Io(e)
            })?;
            log::info!("Created data directory: {:?}", self.dir);
        }

        let path = self.path_for(key);
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| {
                log::error!("Failed to open {:?} for writing: {:?}", path, e);
                StorageError::Io(e)
            })?;
        file.write_all(value.as_bytes()).map_err(|e| {
            log::error!("Failed to write {:?}: {:?}", path, e);
            StorageError::Io(e)
        })?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                log::error!("Failed to remove {:?}: {:?}", path, e);
                Err(StorageError::Io(e))
            }
        }
    }
}

/// In-memory store. An optional quota caps the total bytes of keys plus
/// values, the way browser storage does.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        MemoryStore {
            items: HashMap::new(),
            quota: Some(quota),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    fn used_excluding(&self, key: &str) -> usize {
        self.items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if let Some(quota) = self.quota {
            let needed = key.len() + value.len();
            let available = quota.saturating_sub(self.used_excluding(key));
            if needed > available {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    available,
                });
            }
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// Reads and validates a JSON record. Absent keys and the `undefined`/`null`
/// sentinels yield `Ok(None)`.
pub fn read_record<T, S>(store: &S, key: &str) -> StorageResult<Option<T>>
where
    T: DeserializeOwned + Validate,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get_item(key)? {
        Some(raw) => raw,
        None => return Ok(None),
    };
    if ABSENT_SENTINELS.contains(&raw.trim()) {
        log::debug!("Key '{}' holds an absent sentinel, skipping", key);
        return Ok(None);
    }

    let record: T = serde_json::from_str(&raw).map_err(|e| {
        let message = e.to_string();
        log::error!("read_record: JSON under '{}' is malformed: {}", key, message);
        StorageError::Deserialization {
            key: key.to_string(),
            message,
        }
    })?;
    record.validate().map_err(|message| {
        log::error!("read_record: record under '{}' failed validation: {}", key, message);
        StorageError::Validation {
            key: key.to_string(),
            message,
        }
    })?;
    Ok(Some(record))
}

pub fn write_record<T, S>(store: &mut S, key: &str, record: &T) -> StorageResult<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let serialized = serde_json::to_string(record).map_err(|e| {
        let msg = format!("JSON serialization of '{}' failed: {}", key, e);
        log::error!("write_record: {}", msg);
        StorageError::Serialization(msg)
    })?;
    store.set_item(key, &serialized)
}

/// Removes every key the app owns. Keeps going past individual failures and
/// returns the first one.
pub fn clear_all<S: KeyValueStore + ?Sized>(store: &mut S) -> StorageResult<()> {
    let mut first_err = None;
    for key in ALL_KEYS {
        if let Err(e) = store.remove_item(key) {
            log::error!("Failed to remove '{}': {}", key, e);
            first_err.get_or_insert(e);
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use tempfile::tempdir;

    fn sample_user() -> User {
        User {
            id: 1700000000000,
            name: "a".to_string(),
            email: "a@b.com".to_string(),
        }
    }

    #[test]
    fn test_file_store_set_get_remove() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("data"));

        assert_eq!(store.get_item(USER_KEY).unwrap(), None);
        store.set_item(USER_KEY, "{\"x\":1}").unwrap();
        assert!(dir.path().join("data").join("movieapp_user.json").exists());
        assert_eq!(store.get_item(USER_KEY).unwrap().as_deref(), Some("{\"x\":1}"));

        store.remove_item(USER_KEY).unwrap();
        assert_eq!(store.get_item(USER_KEY).unwrap(), None);
        // Removing twice is fine.
        store.remove_item(USER_KEY).unwrap();
    }

    #[test]
    fn test_read_record_round_trips_user() {
        let mut store = MemoryStore::new();
        write_record(&mut store, USER_KEY, &sample_user()).unwrap();
        let loaded: Option<User> = read_record(&store, USER_KEY).unwrap();
        assert_eq!(loaded, Some(sample_user()));
    }

    #[test]
    fn test_read_record_treats_sentinels_as_absent() {
        let mut store = MemoryStore::new();
        for sentinel in ["undefined", "null"] {
            store.set_item(USER_KEY, sentinel).unwrap();
            let loaded: Option<User> = read_record(&store, USER_KEY).unwrap();
            assert!(loaded.is_none(), "sentinel {} should read as absent", sentinel);
        }
    }

    #[test]
    fn test_read_record_reports_malformed_json() {
        let mut store = MemoryStore::new();
        store.set_item(USER_KEY, "{not json").unwrap();
        match read_record::<User, _>(&store, USER_KEY) {
            Err(StorageError::Deserialization { key, .. }) => assert_eq!(key, USER_KEY),
            other => panic!("Expected Deserialization error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_record_reports_shape_mismatch() {
        let mut store = MemoryStore::new();
        store
            .set_item(USER_KEY, r#"{"id":0,"name":"a","email":"a@b.com"}"#)
            .unwrap();
        match read_record::<User, _>(&store, USER_KEY) {
            Err(StorageError::Validation { .. }) => {}
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_memory_store_quota() {
        let mut store = MemoryStore::with_quota(32);
        store.set_item("k", "short").unwrap();
        let err = store.set_item("big", &"x".repeat(64)).unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert!(!store.contains_key("big"));
        // Overwriting an existing key only counts the new value.
        store.set_item("k", &"y".repeat(30)).unwrap();
    }

    #[test]
    fn test_clear_all_removes_every_key() {
        let mut store = MemoryStore::new();
        for key in ALL_KEYS {
            store.set_item(key, "[]").unwrap();
        }
        store.set_item("unrelated", "1").unwrap();
        clear_all(&mut store).unwrap();
        for key in ALL_KEYS {
            assert!(!store.contains_key(key));
        }
        assert!(store.contains_key("unrelated"));
    }
}
