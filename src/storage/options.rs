//! Key/value option store
//!
//! Options are plain JSON values addressed by fixed names. Writes are
//! last-writer-wins with no versioning.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use crate::errors::{AppError, AppResult, ErrorContextExt};

/// Trait for option stores
pub trait OptionStore: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<Value>>;

    fn set(&self, key: &str, value: &Value) -> AppResult<()>;

    /// Deleting an absent key is not an error
    fn delete(&self, key: &str) -> AppResult<()>;
}

/// Typed access on top of any [`OptionStore`]
pub trait OptionStoreExt {
    fn get_as<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>>;

    fn set_as<T: Serialize>(&self, key: &str, value: &T) -> AppResult<()>;
}

impl<S: OptionStore + ?Sized> OptionStoreExt for S {
    fn get_as<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        match self.get(key)? {
            Some(value) => serde_json::from_value(value)
                .for_option(key, "decode option")
                .map(Some),
            None => Ok(None),
        }
    }

    fn set_as<T: Serialize>(&self, key: &str, value: &T) -> AppResult<()> {
        let value = serde_json::to_value(value).for_option(key, "encode option")?;
        self.set(key, &value)
    }
}

/// Stores each option as `<data_dir>/<key>.json`
///
/// Writes go through a temporary file in the same directory followed by a
/// rename, so readers see either the old or the new content.
#[derive(Debug, Clone)]
pub struct FileOptionStore {
    dir: PathBuf,
}

impl FileOptionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> AppResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(AppError::validation("option key", format!("invalid option name '{key}'")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl OptionStore for FileOptionStore {
    fn get(&self, key: &str) -> AppResult<Option<Value>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).in_file_operation(&path, "read option")?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&content)
            .for_option(key, "parse option file")
            .map(Some)
    }

    fn set(&self, key: &str, value: &Value) -> AppResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).in_file_operation(&self.dir, "create data directory")?;

        let content = serde_json::to_vec_pretty(value).for_option(key, "encode option")?;
        let mut file = tempfile::NamedTempFile::new_in(&self.dir)
            .in_file_operation(&self.dir, "create temporary option file")?;
        file.write_all(&content)
            .in_file_operation(file.path().to_path_buf(), "write option")?;
        file.persist(&path)
            .map_err(|e| AppError::io_with_source(&path, "replace option file", e.error))?;

        debug!("Wrote option '{}' to {:?}", key, path);
        Ok(())
    }

    fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::io_with_source(&path, "delete option", e)),
        }
    }
}

/// In-process store, used by tests and embedders without a data directory
#[derive(Debug, Default)]
pub struct MemoryOptionStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryOptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<String, Value>> {
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl OptionStore for MemoryOptionStore {
    fn get(&self, key: &str) -> AppResult<Option<Value>> {
        Ok(self.values().get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> AppResult<()> {
        self.values().insert(key.to_string(), value.clone());
        Ok(())
    }

    fn delete(&self, key: &str) -> AppResult<()> {
        self.values().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileOptionStore::new(temp_dir.path().join("data"));

        assert_eq!(store.get("pfb_notifications").unwrap(), None);

        store.set("pfb_notifications", &json!([{ "title": "A" }])).unwrap();
        assert_eq!(
            store.get("pfb_notifications").unwrap(),
            Some(json!([{ "title": "A" }]))
        );
        assert!(temp_dir.path().join("data/pfb_notifications.json").exists());

        store.delete("pfb_notifications").unwrap();
        assert_eq!(store.get("pfb_notifications").unwrap(), None);
        store.delete("pfb_notifications").unwrap();
    }

    #[test]
    fn test_file_store_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileOptionStore::new(temp_dir.path());

        store.set("k", &json!(1)).unwrap();
        store.set("k", &json!(2)).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(json!(2)));
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileOptionStore::new(temp_dir.path());

        assert!(store.set("../escape", &json!(1)).is_err());
        assert!(store.get("").is_err());
    }

    #[test]
    fn test_corrupt_file_is_a_store_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileOptionStore::new(temp_dir.path());
        std::fs::write(temp_dir.path().join("broken.json"), "{ not json").unwrap();

        assert!(matches!(store.get("broken"), Err(AppError::Store { .. })));
    }

    #[test]
    fn test_typed_access() {
        let store = MemoryOptionStore::new();
        store.set_as("numbers", &vec![1u8, 2, 3]).unwrap();

        let numbers: Option<Vec<u8>> = store.get_as("numbers").unwrap();
        assert_eq!(numbers, Some(vec![1, 2, 3]));

        let missing: Option<Vec<u8>> = store.get_as("missing").unwrap();
        assert_eq!(missing, None);
    }
}
