//! Service for the "fully booked" banner flag.
//!
//! The flag is kept in an injected [`KeyValueStore`] rather than a global, so
//! the admin toggle and the banner read the same value. [`JsonFileStore`]
//! keeps it across restarts; [`MemoryStore`] for the lifetime of the process.

use crate::config::FULLY_BOOKED_KEY;
use crate::error::{AppError, Result};
use log::{info, warn};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Minimal string store the flag is persisted in.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// In-process store; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AppError::Storage("memory store lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a flat JSON object on disk.
///
/// The file is read on every access and rewritten on every change. A missing
/// file is an empty store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => serde_json::from_str(&json)
                .map_err(|e| AppError::Storage(format!("{}: {}", self.path.display(), e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(AppError::Storage(format!("{}: {}", self.path.display(), e))),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read()?;
        entries.insert(key.to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| AppError::Storage(e.to_string()))?;
        std::fs::write(&self.path, json)
            .map_err(|e| AppError::Storage(format!("{}: {}", self.path.display(), e)))
    }
}

/// Reads and flips the fully-booked flag.
pub struct AvailabilityService<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> AvailabilityService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// A missing or unrecognised value counts as available.
    pub fn is_fully_booked(&self) -> bool {
        self.store.get(FULLY_BOOKED_KEY).as_deref() == Some("true")
    }

    /// Flips the flag, stores it, and returns the new value.
    ///
    /// When the store rejects the write the flag is left as it was.
    pub fn toggle(&self) -> Result<bool> {
        let fully_booked = !self.is_fully_booked();
        self.store.set(FULLY_BOOKED_KEY, &fully_booked.to_string())?;
        info!("Fully booked banner {}", if fully_booked { "shown" } else { "hidden" });
        Ok(fully_booked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> JsonFileStore {
        let path = std::env::temp_dir().join(format!(
            "btq-showcase-{}-{}.json",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        JsonFileStore::new(path)
    }

    #[test]
    fn empty_store_means_available() {
        let service = AvailabilityService::new(MemoryStore::new());
        assert!(!service.is_fully_booked());
    }

    #[test]
    fn toggle_flips_and_persists() {
        let store = MemoryStore::new();
        let service = AvailabilityService::new(store.clone());

        assert!(service.toggle().unwrap());
        assert_eq!(store.get(FULLY_BOOKED_KEY).as_deref(), Some("true"));
        assert!(AvailabilityService::new(store.clone()).is_fully_booked());

        assert!(!service.toggle().unwrap());
        assert_eq!(store.get(FULLY_BOOKED_KEY).as_deref(), Some("false"));
    }

    #[test]
    fn unrecognised_value_counts_as_available() {
        let store = MemoryStore::new();
        store.set(FULLY_BOOKED_KEY, "yes").unwrap();
        assert!(!AvailabilityService::new(store).is_fully_booked());
    }

    #[test]
    fn file_store_survives_a_restart() {
        let store = temp_store("restart");
        assert!(AvailabilityService::new(store.clone()).toggle().unwrap());

        let reopened = AvailabilityService::new(JsonFileStore::new(store.path()));
        assert!(reopened.is_fully_booked());

        let _ = std::fs::remove_file(store.path());
    }

    #[test]
    fn file_store_keeps_other_keys() {
        let store = temp_store("keys");
        store.set("other", "1").unwrap();
        store.set(FULLY_BOOKED_KEY, "true").unwrap();
        assert_eq!(store.get("other").as_deref(), Some("1"));

        let _ = std::fs::remove_file(store.path());
    }

    #[test]
    fn corrupt_file_fails_the_toggle() {
        let store = temp_store("corrupt");
        std::fs::write(store.path(), "not json").unwrap();

        let service = AvailabilityService::new(store.clone());
        assert!(!service.is_fully_booked());
        assert!(matches!(service.toggle(), Err(AppError::Storage(_))));

        let _ = std::fs::remove_file(store.path());
    }

    #[test]
    fn boxed_stores_work_behind_the_trait() {
        let store: Box<dyn KeyValueStore + Send + Sync> = Box::new(MemoryStore::new());
        let service = AvailabilityService::new(store);
        assert!(service.toggle().unwrap());
        assert!(service.is_fully_booked());
    }
}
