//! Transaction repository
//!
//! Transactions are kept newest-first by insertion and persisted under the
//! `transactions` key.

use std::sync::Arc;

use crate::error::FinanceError;
use crate::models::{Transaction, TransactionId};

use super::collection::JsonCollection;
use super::{keys, KeyValueStore};

pub struct TransactionRepository {
    records: JsonCollection<Transaction>,
}

impl TransactionRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            records: JsonCollection::new(keys::TRANSACTIONS, store),
        }
    }

    pub(crate) fn records(&self) -> &JsonCollection<Transaction> {
        &self.records
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, FinanceError> {
        self.records.find(|t| t.id == id)
    }

    /// Look up a transaction by full or abbreviated ID
    pub fn find(&self, identifier: &str) -> Result<Option<Transaction>, FinanceError> {
        self.records
            .resolve(identifier, "Transaction", |t, ident| t.id.matches(ident))
    }

    /// All transactions, newest insertion first
    pub fn get_all(&self) -> Result<Vec<Transaction>, FinanceError> {
        self.records.all()
    }

    /// Insert at the front of the list
    pub fn prepend(&self, transaction: Transaction) -> Result<(), FinanceError> {
        self.records.write()?.insert(0, transaction);
        Ok(())
    }

    /// Remove a transaction, returning it if it existed
    pub fn remove(&self, id: TransactionId) -> Result<Option<Transaction>, FinanceError> {
        let mut records = self.records.write()?;
        Ok(records
            .iter()
            .position(|t| t.id == id)
            .map(|index| records.remove(index)))
    }

    pub fn replace_all(&self, transactions: Vec<Transaction>) -> Result<(), FinanceError> {
        self.records.replace_all(transactions)
    }

    pub fn count(&self) -> Result<usize, FinanceError> {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, TransactionType};
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn txn(cents: i64) -> Transaction {
        Transaction::new(
            TransactionType::Expense,
            Money::from_cents(cents),
            "Food",
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        )
    }

    #[test]
    fn test_prepend_keeps_newest_first() {
        let repo = TransactionRepository::new(Arc::new(MemoryStore::new()));
        let first = txn(100);
        let second = txn(200);
        repo.prepend(first.clone()).unwrap();
        repo.prepend(second.clone()).unwrap();

        let all = repo.get_all().unwrap();
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
    }

    #[test]
    fn test_find_by_display_id_and_remove() {
        let repo = TransactionRepository::new(Arc::new(MemoryStore::new()));
        let t = txn(100);
        repo.prepend(t.clone()).unwrap();

        let found = repo.find(&t.id.to_string()).unwrap();
        assert_eq!(found.map(|f| f.id), Some(t.id));

        assert!(repo.remove(t.id).unwrap().is_some());
        assert!(repo.remove(t.id).unwrap().is_none());
        assert_eq!(repo.count().unwrap(), 0);
    }
}
