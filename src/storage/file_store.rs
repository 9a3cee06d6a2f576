//! Directory-backed key/value store
//!
//! Each key is a JSON document at `<dir>/<key>.json`.

use std::fs;
use std::path::PathBuf;

use crate::error::FinanceError;

use super::file_io::{read_string, write_atomic};
use super::KeyValueStore;

const EXTENSION: &str = "json";

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, FinanceError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(FinanceError::Storage(format!("Invalid storage key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.{}", key, EXTENSION)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, FinanceError> {
        read_string(self.path_for(key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), FinanceError> {
        write_atomic(self.path_for(key)?, value.as_bytes())
    }

    fn remove(&self, key: &str) -> Result<(), FinanceError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FinanceError::Storage(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn keys(&self) -> Result<Vec<String>, FinanceError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(FinanceError::Storage(format!(
                    "Failed to list {}: {}",
                    self.dir.display(),
                    e
                )))
            }
        };

        let mut keys: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == EXTENSION))
            .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_get_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("data"));

        assert_eq!(store.get("transactions").unwrap(), None);

        store.set("transactions", "[]").unwrap();
        assert!(temp_dir.path().join("data/transactions.json").exists());
        assert_eq!(store.get("transactions").unwrap().as_deref(), Some("[]"));

        store.remove("transactions").unwrap();
        assert_eq!(store.get("transactions").unwrap(), None);
        store.remove("transactions").unwrap();
    }

    #[test]
    fn test_keys_lists_json_documents() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().to_path_buf());
        store.set("categories", "[]").unwrap();
        store.set("budgetGoals", "[]").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(store.keys().unwrap(), vec!["budgetGoals", "categories"]);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().to_path_buf());
        assert!(store.set("../escape", "{}").is_err());
        assert!(store.get("").is_err());
    }
}
