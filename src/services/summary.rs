//! Summary service
//!
//! Derived figures over the stored collections. Nothing here is persisted;
//! every call recomputes from the current transactions.

use chrono::NaiveDate;

use crate::error::FinanceResult;
use crate::models::Transaction;
use crate::reports::{GoalReport, MonthlyTrend, SpendingReport, Totals};
use crate::services::filter::TransactionFilter;
use crate::storage::Storage;

/// Service for totals and report generation
pub struct SummaryService<'a> {
    storage: &'a Storage,
}

impl<'a> SummaryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Income, expenses and balance across every transaction
    pub fn totals(&self) -> FinanceResult<Totals> {
        let transactions = self.storage.transactions.records().read()?;
        Ok(Totals::from_transactions(transactions.iter()))
    }

    /// Totals over the transactions selected by a filter
    pub fn totals_for(&self, filter: &TransactionFilter, today: NaiveDate) -> FinanceResult<Totals> {
        let selected = self.filtered(filter, today)?;
        Ok(Totals::from_transactions(&selected))
    }

    /// Spending broken down by category
    pub fn spending(&self, filter: &TransactionFilter, today: NaiveDate) -> FinanceResult<SpendingReport> {
        let selected = self.filtered(filter, today)?;
        let categories = self.storage.categories.get_all()?;
        Ok(SpendingReport::generate(&selected, &categories))
    }

    /// Income and expenses per calendar month
    pub fn trend(&self, filter: &TransactionFilter, today: NaiveDate) -> FinanceResult<MonthlyTrend> {
        let selected = self.filtered(filter, today)?;
        Ok(MonthlyTrend::generate(&selected))
    }

    /// Progress of every budget goal
    pub fn goals(&self) -> FinanceResult<GoalReport> {
        let goals = self.storage.budget_goals.get_all()?;
        Ok(GoalReport::generate(&goals))
    }

    fn filtered(&self, filter: &TransactionFilter, today: NaiveDate) -> FinanceResult<Vec<Transaction>> {
        let transactions = self.storage.transactions.records().read()?;
        Ok(filter.apply(&transactions, today))
    }
}
