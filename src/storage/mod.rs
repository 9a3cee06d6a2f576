//! Storage layer for fintrack
//!
//! A `KeyValueStore` holds serialized documents by key. `ChunkedStore` splits
//! large documents for size-limited backends, `FileStore` keeps one JSON file
//! per key and `MemoryStore` is used for tests. Repositories keep the
//! in-memory collections and the `Storage` coordinator ties them together.

pub mod budget_goals;
pub mod categories;
pub mod chunked;
pub mod collection;
pub mod file_io;
pub mod file_store;
pub mod init;
pub mod memory;
pub mod recurring;
pub mod transactions;

pub use budget_goals::BudgetGoalRepository;
pub use categories::CategoryRepository;
pub use chunked::ChunkedStore;
pub use file_store::FileStore;
pub use init::initialize_storage;
pub use memory::MemoryStore;
pub use recurring::RecurringRepository;
pub use transactions::TransactionRepository;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, error, info, warn};

use crate::config::paths::FinancePaths;
use crate::error::FinanceError;
use collection::{fingerprint, PersistedCollection};

/// Default maximum size in bytes of a single stored value
pub const DEFAULT_CHUNK_SIZE: usize = 4000;

/// Keys the collections are persisted under
pub mod keys {
    pub const TRANSACTIONS: &str = "transactions";
    pub const CATEGORIES: &str = "categories";
    pub const BUDGET_GOALS: &str = "budgetGoals";
    pub const RECURRING_TRANSACTIONS: &str = "recurringTransactions";

    pub const ALL: [&str; 4] = [TRANSACTIONS, CATEGORIES, BUDGET_GOALS, RECURRING_TRANSACTIONS];
}

/// String key/value persistence backend
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, FinanceError>;
    fn set(&self, key: &str, value: &str) -> Result<(), FinanceError>;
    fn remove(&self, key: &str) -> Result<(), FinanceError>;
    fn keys(&self) -> Result<Vec<String>, FinanceError>;
}

/// Where a change to a persisted collection came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// Written through this `Storage`
    Local,
    /// Picked up by `Storage::sync_external`
    External,
}

/// Notification that a collection changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: &'static str,
    pub origin: ChangeOrigin,
}

type Listener = Box<dyn Fn(&StorageEvent) + Send + Sync>;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    store: Arc<dyn KeyValueStore>,
    pub transactions: TransactionRepository,
    pub categories: CategoryRepository,
    pub budget_goals: BudgetGoalRepository,
    pub recurring: RecurringRepository,
    fingerprints: RwLock<HashMap<&'static str, u64>>,
    listeners: RwLock<Vec<Listener>>,
}

impl Storage {
    /// Wrap a store without loading anything
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            transactions: TransactionRepository::new(store.clone()),
            categories: CategoryRepository::new(store.clone()),
            budget_goals: BudgetGoalRepository::new(store.clone()),
            recurring: RecurringRepository::new(store.clone()),
            store,
            fingerprints: RwLock::new(HashMap::new()),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Open the on-disk store under `paths` and load every collection
    pub fn open(paths: &FinancePaths, chunk_size: usize) -> Result<Self, FinanceError> {
        paths.ensure_directories()?;
        let store = ChunkedStore::new(FileStore::new(paths.data_dir()), chunk_size);
        let storage = Self::new(Arc::new(store));
        storage.load_all()?;
        Ok(storage)
    }

    /// Empty storage backed by memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    fn collections(&self) -> [&dyn PersistedCollection; 4] {
        [
            self.transactions.records(),
            self.categories.records(),
            self.budget_goals.records(),
            self.recurring.records(),
        ]
    }

    fn collection(&self, key: &str) -> Option<&dyn PersistedCollection> {
        self.collections().into_iter().find(|c| c.key() == key)
    }

    fn remember(&self, key: &'static str, print: u64) {
        if let Ok(mut prints) = self.fingerprints.write() {
            prints.insert(key, print);
        }
    }

    fn known(&self, key: &str) -> Option<u64> {
        self.fingerprints
            .read()
            .ok()
            .and_then(|prints| prints.get(key).copied())
    }

    /// Load all collections from the store
    pub fn load_all(&self) -> Result<(), FinanceError> {
        for collection in self.collections() {
            let print = collection.load()?;
            self.remember(collection.key(), print);
        }
        debug!("Loaded all collections");
        Ok(())
    }

    /// Persist one collection after a mutation.
    ///
    /// Failures are logged and the in-memory state is kept, so callers keep
    /// working against what the user just entered. Returns whether the write
    /// succeeded.
    pub fn persist(&self, key: &'static str) -> bool {
        let Some(collection) = self.collection(key) else {
            warn!(key, "Persist requested for unknown collection");
            return false;
        };

        match collection.save() {
            Ok(print) => {
                self.remember(key, print);
                debug!(key, "Persisted collection");
                self.notify(&StorageEvent {
                    key,
                    origin: ChangeOrigin::Local,
                });
                true
            }
            Err(e) => {
                error!(key, error = %e, "Failed to persist collection, keeping in-memory state");
                false
            }
        }
    }

    /// Register a callback run after each change.
    ///
    /// Listeners must not subscribe further listeners from inside the callback.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&StorageEvent) + Send + Sync + 'static,
    {
        match self.listeners.write() {
            Ok(mut listeners) => listeners.push(Box::new(listener)),
            Err(e) => error!(error = %e, "Failed to register storage listener"),
        }
    }

    fn notify(&self, event: &StorageEvent) {
        if let Ok(listeners) = self.listeners.read() {
            for listener in listeners.iter() {
                listener(event);
            }
        }
    }

    /// Reload collections that were changed in the store by someone else.
    ///
    /// Compares each persisted document against the last one this instance
    /// read or wrote; changed collections are reloaded (the external write
    /// wins) and announced with `ChangeOrigin::External`.
    pub fn sync_external(&self) -> Result<Vec<&'static str>, FinanceError> {
        let mut changed = Vec::new();
        for collection in self.collections() {
            let key = collection.key();
            let raw = collection.read_raw()?;
            let print = fingerprint(raw.as_deref());
            if self.known(key) == Some(print) {
                continue;
            }

            collection.load_from(raw.as_deref())?;
            self.remember(key, print);
            info!(key, "Reloaded collection changed outside this session");
            self.notify(&StorageEvent {
                key,
                origin: ChangeOrigin::External,
            });
            changed.push(key);
        }
        Ok(changed)
    }

    /// Whether any collection has been persisted yet
    pub fn is_initialized(&self) -> bool {
        match self.store.keys() {
            Ok(stored) => stored.iter().any(|k| keys::ALL.contains(&k.as_str())),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, CategoryType};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Store whose writes always fail
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, FinanceError> {
            Ok(None)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), FinanceError> {
            Err(FinanceError::Storage("quota exceeded".into()))
        }
        fn remove(&self, _key: &str) -> Result<(), FinanceError> {
            Ok(())
        }
        fn keys(&self) -> Result<Vec<String>, FinanceError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_open_creates_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(&paths, DEFAULT_CHUNK_SIZE).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_persist_round_trips_through_files() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());

        let storage = Storage::open(&paths, 64).unwrap();
        for category in Category::defaults() {
            storage.categories.insert(category).unwrap();
        }
        assert!(storage.persist(keys::CATEGORIES));
        assert!(storage.is_initialized());
        assert!(temp_dir.path().join("data/categories_meta.json").exists());

        let reopened = Storage::open(&paths, 64).unwrap();
        assert_eq!(
            reopened.categories.count().unwrap(),
            Category::defaults().len()
        );
    }

    #[test]
    fn test_failed_persist_keeps_memory_state() {
        let storage = Storage::new(Arc::new(ReadOnlyStore));
        storage
            .categories
            .insert(Category::new("Food", "🍔", CategoryType::Expense))
            .unwrap();

        assert!(!storage.persist(keys::CATEGORIES));
        assert_eq!(storage.categories.count().unwrap(), 1);
    }

    #[test]
    fn test_subscribers_receive_local_events() {
        let storage = Storage::in_memory();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        storage.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        storage.persist(keys::BUDGET_GOALS);

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![StorageEvent {
                key: keys::BUDGET_GOALS,
                origin: ChangeOrigin::Local
            }]
        );
    }

    #[test]
    fn test_sync_external_reloads_changed_collections() {
        let shared: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let ours = Storage::new(shared.clone());
        ours.load_all().unwrap();
        let theirs = Storage::new(shared);
        theirs.load_all().unwrap();

        theirs
            .categories
            .insert(Category::new("Travel", "✈️", CategoryType::Expense))
            .unwrap();
        theirs.persist(keys::CATEGORIES);

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        ours.subscribe(move |event| sink.lock().unwrap().push(event.origin));

        assert_eq!(ours.sync_external().unwrap(), vec![keys::CATEGORIES]);
        assert_eq!(ours.categories.count().unwrap(), 1);
        assert_eq!(*events.lock().unwrap(), vec![ChangeOrigin::External]);

        assert!(ours.sync_external().unwrap().is_empty());
    }
}
