//! JSON Export functionality
//!
//! Exports every collection as one pretty-printed document. The same
//! document shape is accepted back by `ImportService`.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FinanceError, FinanceResult};
use crate::models::{BudgetGoal, Category, RecurringTransaction, Transaction};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full data export
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    pub budget_goals: Vec<BudgetGoal>,
    pub recurring_transactions: Vec<RecurringTransaction>,
}

impl FullExport {
    /// Snapshot the current state of storage
    pub fn from_storage(storage: &Storage) -> FinanceResult<Self> {
        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            transactions: storage.transactions.get_all()?,
            categories: storage.categories.get_all()?,
            budget_goals: storage.budget_goals.get_all()?,
            recurring_transactions: storage.recurring.get_all()?,
        })
    }

    pub fn record_count(&self) -> usize {
        self.transactions.len()
            + self.categories.len()
            + self.budget_goals.len()
            + self.recurring_transactions.len()
    }
}

/// Export everything as pretty-printed JSON
pub fn export_full_json<W: Write>(storage: &Storage, writer: &mut W) -> FinanceResult<()> {
    let export = FullExport::from_storage(storage)?;

    serde_json::to_writer_pretty(&mut *writer, &export)
        .map_err(|e| FinanceError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| FinanceError::Export(e.to_string()))?;

    Ok(())
}

/// Export everything as a pretty-printed JSON string
pub fn export_full_json_string(storage: &Storage) -> FinanceResult<String> {
    let mut buffer = Vec::new();
    export_full_json(storage, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| FinanceError::Export(e.to_string()))
}
