//! Monthly Trend Report
//!
//! Income, expenses and net per calendar month.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::{Money, MoneyFormat, Transaction, TransactionType};

/// Totals for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub income: Money,
    pub expenses: Money,
    pub net: Money,
    pub transaction_count: usize,
}

impl MonthSummary {
    fn empty(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            income: Money::zero(),
            expenses: Money::zero(),
            net: Money::zero(),
            transaction_count: 0,
        }
    }

    /// First day of the month
    pub fn start(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Short label such as `Mar 2024`
    pub fn label(&self) -> String {
        match self.start() {
            Some(date) => date.format("%b %Y").to_string(),
            None => format!("{}-{:02}", self.year, self.month),
        }
    }
}

/// Monthly Trend Report
#[derive(Debug, Clone, Default)]
pub struct MonthlyTrend {
    /// Oldest month first
    pub months: Vec<MonthSummary>,
}

impl MonthlyTrend {
    /// Group transactions by the calendar month of their date.
    ///
    /// Only months that contain transactions are listed.
    pub fn generate(transactions: &[Transaction]) -> Self {
        let mut months: BTreeMap<(i32, u32), MonthSummary> = BTreeMap::new();

        for txn in transactions {
            let key = (txn.date.year(), txn.date.month());
            let summary = months
                .entry(key)
                .or_insert_with(|| MonthSummary::empty(key.0, key.1));
            match txn.kind {
                TransactionType::Income => summary.income += txn.amount,
                TransactionType::Expense => summary.expenses += txn.amount,
            }
            summary.net = summary.income - summary.expenses;
            summary.transaction_count += 1;
        }

        Self {
            months: months.into_values().collect(),
        }
    }

    /// Keep only the most recent `count` months
    pub fn last(mut self, count: usize) -> Self {
        let skip = self.months.len().saturating_sub(count);
        self.months.drain(..skip);
        self
    }

    pub fn format_terminal(&self, money: &MoneyFormat) -> String {
        let mut output = String::new();

        output.push_str("Monthly Trend\n");
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<10} {:>15} {:>15} {:>15}\n",
            "Month", "Income", "Expenses", "Net"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for month in &self.months {
            output.push_str(&format!(
                "{:<10} {:>15} {:>15} {:>15}\n",
                month.label(),
                month.income.format(money),
                month.expenses.format(money),
                month.net.format(money)
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(kind: TransactionType, cents: i64, y: i32, m: u32, d: u32) -> Transaction {
        Transaction::new(
            kind,
            Money::from_cents(cents),
            "Any",
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        )
    }

    #[test]
    fn test_groups_by_month() {
        let transactions = vec![
            txn(TransactionType::Expense, 1_000, 2024, 3, 5),
            txn(TransactionType::Income, 50_000, 2024, 2, 1),
            txn(TransactionType::Expense, 2_000, 2024, 2, 29),
            txn(TransactionType::Expense, 500, 2023, 12, 31),
        ];

        let trend = MonthlyTrend::generate(&transactions);
        assert_eq!(trend.months.len(), 3);

        let feb = trend.months[1];
        assert_eq!((feb.year, feb.month), (2024, 2));
        assert_eq!(feb.income, Money::from_cents(50_000));
        assert_eq!(feb.expenses, Money::from_cents(2_000));
        assert_eq!(feb.net, Money::from_cents(48_000));
        assert_eq!(feb.transaction_count, 2);
        assert_eq!(feb.label(), "Feb 2024");
    }

    #[test]
    fn test_last_keeps_recent_months() {
        let transactions = vec![
            txn(TransactionType::Expense, 100, 2024, 1, 1),
            txn(TransactionType::Expense, 100, 2024, 2, 1),
            txn(TransactionType::Expense, 100, 2024, 3, 1),
        ];

        let trend = MonthlyTrend::generate(&transactions).last(2);
        assert_eq!(trend.months.len(), 2);
        assert_eq!(trend.months[0].month, 2);
    }
}
