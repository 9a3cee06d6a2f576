//! Recurring transaction repository
//!
//! Persisted under the `recurringTransactions` key.

use std::sync::Arc;

use crate::error::FinanceError;
use crate::models::{RecurringId, RecurringTransaction};

use super::collection::JsonCollection;
use super::{keys, KeyValueStore};

pub struct RecurringRepository {
    records: JsonCollection<RecurringTransaction>,
}

impl RecurringRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            records: JsonCollection::new(keys::RECURRING_TRANSACTIONS, store),
        }
    }

    pub(crate) fn records(&self) -> &JsonCollection<RecurringTransaction> {
        &self.records
    }

    pub fn get(&self, id: RecurringId) -> Result<Option<RecurringTransaction>, FinanceError> {
        self.records.find(|r| r.id == id)
    }

    /// Look up by name (case-insensitive), then by ID
    pub fn find(&self, identifier: &str) -> Result<Option<RecurringTransaction>, FinanceError> {
        let lowered = identifier.trim().to_lowercase();
        if let Some(found) = self.records.find(|r| r.name.to_lowercase() == lowered)? {
            return Ok(Some(found));
        }
        self.records
            .resolve(identifier, "Recurring transaction", |r, ident| r.id.matches(ident))
    }

    pub fn get_all(&self) -> Result<Vec<RecurringTransaction>, FinanceError> {
        self.records.all()
    }

    pub fn insert(&self, recurring: RecurringTransaction) -> Result<(), FinanceError> {
        self.records.write()?.push(recurring);
        Ok(())
    }

    pub fn update(&self, recurring: RecurringTransaction) -> Result<bool, FinanceError> {
        let mut records = self.records.write()?;
        match records.iter_mut().find(|r| r.id == recurring.id) {
            Some(existing) => {
                *existing = recurring;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove(&self, id: RecurringId) -> Result<Option<RecurringTransaction>, FinanceError> {
        let mut records = self.records.write()?;
        Ok(records
            .iter()
            .position(|r| r.id == id)
            .map(|index| records.remove(index)))
    }

    pub fn replace_all(&self, recurring: Vec<RecurringTransaction>) -> Result<(), FinanceError> {
        self.records.replace_all(recurring)
    }

    pub fn count(&self) -> Result<usize, FinanceError> {
        self.records.len()
    }
}
