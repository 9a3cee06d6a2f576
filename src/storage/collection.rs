//! A persisted list of records under one store key
//!
//! Every repository keeps its records in insertion order and writes them back
//! as a single JSON array.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::FinanceError;

use super::KeyValueStore;

/// Hash of a persisted document, used to notice writes from elsewhere
pub fn fingerprint(raw: Option<&str>) -> u64 {
    let mut hasher = DefaultHasher::new();
    raw.hash(&mut hasher);
    hasher.finish()
}

pub struct JsonCollection<T> {
    key: &'static str,
    store: Arc<dyn KeyValueStore>,
    items: RwLock<Vec<T>>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn new(key: &'static str, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            key,
            store,
            items: RwLock::new(Vec::new()),
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Read the raw persisted document
    pub fn read_raw(&self) -> Result<Option<String>, FinanceError> {
        self.store.get(self.key)
    }

    /// Replace the in-memory records with a persisted document.
    ///
    /// A missing document means an empty collection.
    pub fn load_from(&self, raw: Option<&str>) -> Result<(), FinanceError> {
        let records: Vec<T> = match raw {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(raw).map_err(|e| {
                FinanceError::Storage(format!("Failed to parse '{}': {}", self.key, e))
            })?,
            _ => Vec::new(),
        };
        *self.write()? = records;
        Ok(())
    }

    /// Write the records to the store, returning the new fingerprint
    pub fn save(&self) -> Result<u64, FinanceError> {
        let json = {
            let items = self.read()?;
            serde_json::to_string(&*items).map_err(|e| {
                FinanceError::Storage(format!("Failed to serialize '{}': {}", self.key, e))
            })?
        };
        self.store.set(self.key, &json)?;
        Ok(fingerprint(Some(&json)))
    }

    pub fn read(&self) -> Result<RwLockReadGuard<'_, Vec<T>>, FinanceError> {
        self.items
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    pub fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<T>>, FinanceError> {
        self.items
            .write()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    pub fn all(&self) -> Result<Vec<T>, FinanceError> {
        Ok(self.read()?.clone())
    }

    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Result<Option<T>, FinanceError> {
        Ok(self.read()?.iter().find(|item| predicate(item)).cloned())
    }

    pub fn replace_all(&self, records: Vec<T>) -> Result<(), FinanceError> {
        *self.write()? = records;
        Ok(())
    }

    pub fn len(&self) -> Result<usize, FinanceError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, FinanceError> {
        Ok(self.read()?.is_empty())
    }

    /// Find the single record a user-supplied identifier refers to
    pub fn resolve(
        &self,
        identifier: &str,
        entity_type: &'static str,
        matches: impl Fn(&T, &str) -> bool,
    ) -> Result<Option<T>, FinanceError> {
        let items = self.read()?;
        let mut found = items.iter().filter(|item| matches(item, identifier));
        let first = found.next().cloned();
        let extra = found.count();
        if extra > 0 {
            return Err(FinanceError::Validation(format!(
                "'{}' matches {} {} records, use a longer id",
                identifier,
                extra + 1,
                entity_type.to_lowercase()
            )));
        }
        Ok(first)
    }
}

/// Type-erased view the storage coordinator uses to load and save
pub trait PersistedCollection: Send + Sync {
    fn key(&self) -> &'static str;
    fn read_raw(&self) -> Result<Option<String>, FinanceError>;
    fn load_from(&self, raw: Option<&str>) -> Result<(), FinanceError>;
    fn save(&self) -> Result<u64, FinanceError>;

    /// Load from the store, returning the document's fingerprint
    fn load(&self) -> Result<u64, FinanceError> {
        let raw = self.read_raw()?;
        self.load_from(raw.as_deref())?;
        Ok(fingerprint(raw.as_deref()))
    }
}

impl<T> PersistedCollection for JsonCollection<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    fn key(&self) -> &'static str {
        JsonCollection::key(self)
    }

    fn read_raw(&self) -> Result<Option<String>, FinanceError> {
        JsonCollection::read_raw(self)
    }

    fn load_from(&self, raw: Option<&str>) -> Result<(), FinanceError> {
        JsonCollection::load_from(self, raw)
    }

    fn save(&self) -> Result<u64, FinanceError> {
        JsonCollection::save(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_missing_document_loads_empty() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let collection: JsonCollection<String> = JsonCollection::new("notes", store);

        collection.load().unwrap();
        assert!(collection.is_empty().unwrap());
    }

    #[test]
    fn test_save_then_load() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let collection: JsonCollection<String> = JsonCollection::new("notes", store.clone());
        collection
            .replace_all(vec!["rent".into(), "coffee".into()])
            .unwrap();
        let saved = collection.save().unwrap();

        assert_eq!(store.get("notes").unwrap().as_deref(), Some(r#"["rent","coffee"]"#));

        let reloaded: JsonCollection<String> = JsonCollection::new("notes", store);
        assert_eq!(reloaded.load().unwrap(), saved);
        assert_eq!(reloaded.len().unwrap(), 2);
    }

    #[test]
    fn test_resolve_rejects_ambiguous_identifier() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let collection: JsonCollection<String> = JsonCollection::new("notes", store);
        collection
            .replace_all(vec!["rent".into(), "refund".into(), "coffee".into()])
            .unwrap();

        let by_prefix = |item: &String, id: &str| item.starts_with(id);
        assert_eq!(
            collection.resolve("co", "Note", by_prefix).unwrap().as_deref(),
            Some("coffee")
        );
        assert!(collection.resolve("x", "Note", by_prefix).unwrap().is_none());
        assert!(collection.resolve("re", "Note", by_prefix).is_err());
    }

    #[test]
    fn test_corrupt_document_is_storage_error() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set("notes", "{not json").unwrap();
        let collection: JsonCollection<String> = JsonCollection::new("notes", store);

        assert!(matches!(collection.load(), Err(FinanceError::Storage(_))));
    }
}
