//! Local save store.
//!
//! String-keyed JSON values persisted to a single file: crossword progress,
//! completed-puzzle ids, the dodge best score. A missing or unreadable file
//! loads as empty so a fresh machine (or a corrupted save) never blocks the
//! games.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

const SAVE_FILE_NAME: &str = ".retro-arcade.json";

#[derive(Debug)]
pub struct SaveStore {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl SaveStore {
    /// Open a store backed by `path`, loading whatever is already there.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = fs::read_to_string(&path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default();
        Self { path, entries }
    }

    /// The per-user default save location: the home directory when known,
    /// the working directory otherwise.
    pub fn default_path() -> PathBuf {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(SAVE_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deserialize the value under `key`, if present and well-typed.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.entries
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Store a value under `key` and flush the file.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value).context("serialize save value")?;
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    /// Drop a key and flush. Removing a missing key is fine.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.entries).context("serialize save file")?;
        fs::write(&self.path, text)
            .with_context(|| format!("write save file {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> SaveStore {
        let path = std::env::temp_dir().join(format!("retro-arcade-test-{name}-{}.json", std::process::id()));
        let _ = fs::remove_file(&path);
        SaveStore::open(path)
    }

    #[test]
    fn missing_file_loads_empty() {
        let store = temp_store("missing");
        assert!(!store.contains("anything"));
        assert_eq!(store.get::<u32>("anything"), None);
    }

    #[test]
    fn set_get_round_trip_across_reopen() {
        let mut store = temp_store("roundtrip");
        store.set("dodge/best", &42u32).unwrap();
        store.set("greeting", &"hello".to_string()).unwrap();

        let reopened = SaveStore::open(store.path());
        assert_eq!(reopened.get::<u32>("dodge/best"), Some(42));
        assert_eq!(reopened.get::<String>("greeting"), Some("hello".into()));
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn wrong_type_reads_as_none() {
        let mut store = temp_store("types");
        store.set("key", &"text".to_string()).unwrap();
        assert_eq!(store.get::<u32>("key"), None);
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn remove_deletes_the_key() {
        let mut store = temp_store("remove");
        store.set("key", &1u32).unwrap();
        store.remove("key").unwrap();
        assert!(!store.contains("key"));
        store.remove("never-there").unwrap();
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let path = std::env::temp_dir().join(format!(
            "retro-arcade-test-corrupt-{}.json",
            std::process::id()
        ));
        fs::write(&path, "{ not json").unwrap();
        let store = SaveStore::open(&path);
        assert!(!store.contains("anything"));
        let _ = fs::remove_file(&path);
    }
}
