//! Spending Report
//!
//! Breaks expenses down by category for any set of transactions.

use std::collections::HashMap;
use std::io::Write;

use crate::error::{FinanceError, FinanceResult};
use crate::models::{Category, Money, MoneyFormat, Transaction, DEFAULT_EMOJI};

/// Spending for one category
#[derive(Debug, Clone, PartialEq)]
pub struct SpendingByCategory {
    pub category: String,
    pub emoji: String,
    pub total: Money,
    pub transaction_count: usize,
    /// Percentage of total spending
    pub percentage: f64,
}

/// Spending Report
#[derive(Debug, Clone)]
pub struct SpendingReport {
    /// Largest spending first
    pub categories: Vec<SpendingByCategory>,
    pub total_spending: Money,
    pub total_income: Money,
    /// Number of expense transactions
    pub expense_count: usize,
}

impl SpendingReport {
    /// Aggregate expenses by category name.
    ///
    /// `categories` only supplies emojis; spending in a category that no
    /// longer exists is still reported.
    pub fn generate(transactions: &[Transaction], categories: &[Category]) -> Self {
        let mut by_category: HashMap<&str, (Money, usize, &str)> = HashMap::new();
        let mut total_spending = Money::zero();
        let mut total_income = Money::zero();
        let mut expense_count = 0;

        for txn in transactions {
            if txn.is_income() {
                total_income += txn.amount;
                continue;
            }
            let entry = by_category
                .entry(txn.category.as_str())
                .or_insert((Money::zero(), 0, txn.emoji.as_str()));
            entry.0 += txn.amount;
            entry.1 += 1;
            total_spending += txn.amount;
            expense_count += 1;
        }

        let mut rows: Vec<SpendingByCategory> = by_category
            .into_iter()
            .map(|(name, (total, count, txn_emoji))| {
                let emoji = categories
                    .iter()
                    .find(|c| c.name == name && !c.emoji.is_empty())
                    .map(|c| c.emoji.as_str())
                    .or(Some(txn_emoji).filter(|e| !e.is_empty()))
                    .unwrap_or(DEFAULT_EMOJI);
                let percentage = if total_spending.is_zero() {
                    0.0
                } else {
                    total.as_f64() / total_spending.as_f64() * 100.0
                };
                SpendingByCategory {
                    category: name.to_string(),
                    emoji: emoji.to_string(),
                    total,
                    transaction_count: count,
                    percentage,
                }
            })
            .collect();

        rows.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));

        Self {
            categories: rows,
            total_spending,
            total_income,
            expense_count,
        }
    }

    /// Get top spending categories
    pub fn top_categories(&self, limit: usize) -> &[SpendingByCategory] {
        &self.categories[..limit.min(self.categories.len())]
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, money: &MoneyFormat) -> String {
        let mut output = String::new();

        output.push_str("Spending by Category\n");
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<30} {:>14} {:>6} {:>7}\n",
            "Category", "Amount", "Count", "%"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for row in &self.categories {
            output.push_str(&format!(
                "{:<30} {:>14} {:>6} {:>6.1}%\n",
                format!("{} {}", row.emoji, row.category),
                row.total.format(money),
                row.transaction_count,
                row.percentage
            ));
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<30} {:>14} {:>6}\n",
            "TOTAL SPENDING",
            self.total_spending.format(money),
            self.expense_count
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> FinanceResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer
            .write_record(["Category", "Amount", "Transaction Count", "Percentage"])
            .map_err(|e| FinanceError::Export(e.to_string()))?;

        for row in &self.categories {
            csv_writer
                .write_record([
                    row.category.clone(),
                    format!("{:.2}", row.total.as_f64()),
                    row.transaction_count.to_string(),
                    format!("{:.2}", row.percentage),
                ])
                .map_err(|e| FinanceError::Export(e.to_string()))?;
        }

        csv_writer
            .flush()
            .map_err(|e| FinanceError::Export(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryType, TransactionType};
    use chrono::NaiveDate;

    fn txn(kind: TransactionType, cents: i64, category: &str) -> Transaction {
        Transaction::new(
            kind,
            Money::from_cents(cents),
            category,
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        )
    }

    fn sample() -> Vec<Transaction> {
        vec![
            txn(TransactionType::Expense, 6_000, "Food"),
            txn(TransactionType::Expense, 2_000, "Food"),
            txn(TransactionType::Expense, 2_000, "Transport"),
            txn(TransactionType::Income, 100_000, "Salary"),
        ]
    }

    #[test]
    fn test_generate_spending_report() {
        let categories = vec![Category::new("Food", "🍔", CategoryType::Expense)];
        let report = SpendingReport::generate(&sample(), &categories);

        assert_eq!(report.total_spending, Money::from_cents(10_000));
        assert_eq!(report.total_income, Money::from_cents(100_000));
        assert_eq!(report.expense_count, 3);
        assert_eq!(report.categories.len(), 2);

        let food = &report.categories[0];
        assert_eq!(food.category, "Food");
        assert_eq!(food.emoji, "🍔");
        assert_eq!(food.transaction_count, 2);
        assert!((food.percentage - 80.0).abs() < 1e-9);

        assert_eq!(report.categories[1].emoji, DEFAULT_EMOJI);
    }

    #[test]
    fn test_top_categories() {
        let report = SpendingReport::generate(&sample(), &[]);
        assert_eq!(report.top_categories(1).len(), 1);
        assert_eq!(report.top_categories(10).len(), 2);
    }

    #[test]
    fn test_empty_report() {
        let report = SpendingReport::generate(&[], &[]);
        assert!(report.categories.is_empty());
        assert!(report.format_terminal(&MoneyFormat::default()).contains("TOTAL SPENDING"));
    }

    #[test]
    fn test_export_csv() {
        let report = SpendingReport::generate(&sample(), &[]);
        let mut out = Vec::new();
        report.export_csv(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Category,Amount,Transaction Count,Percentage"));
        assert_eq!(lines.next(), Some("Food,80.00,2,80.00"));
    }
}
