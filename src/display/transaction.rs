//! Transaction display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{short_id, truncate, DisplayOptions};
use crate::models::Transaction;

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Note")]
    note: String,
}

impl TransactionRow {
    fn new(txn: &Transaction, options: &DisplayOptions) -> Self {
        Self {
            id: short_id(&txn.id),
            date: options.date(txn.date),
            category: format!("{} {}", txn.emoji, txn.category).trim().to_string(),
            amount: options.money(txn.signed_amount()),
            note: truncate(txn.note.as_deref().unwrap_or(""), 40),
        }
    }
}

/// Format transactions as a table, in the order given
pub fn format_transaction_table(transactions: &[Transaction], options: &DisplayOptions) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows = transactions.iter().map(|t| TransactionRow::new(t, options));
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

/// Format a single transaction with every field
pub fn format_transaction_details(txn: &Transaction, options: &DisplayOptions) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Type:        {}\n", txn.kind));
    output.push_str(&format!("Date:        {}\n", options.date(txn.date)));
    output.push_str(&format!("Amount:      {}\n", options.money(txn.amount)));
    output.push_str(&format!("Category:    {} {}\n", txn.emoji, txn.category));

    if let Some(note) = &txn.note {
        output.push_str(&format!("Note:        {}\n", note));
    }

    output.push_str(&format!(
        "Created:     {}\n",
        txn.created_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, TransactionType};
    use chrono::NaiveDate;

    fn sample() -> Transaction {
        Transaction::new(
            TransactionType::Expense,
            Money::from_cents(4_250),
            "Food",
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        )
        .with_emoji("🍔")
        .with_note("team lunch")
    }

    #[test]
    fn test_empty_table() {
        let output = format_transaction_table(&[], &DisplayOptions::default());
        assert_eq!(output, "No transactions found.\n");
    }

    #[test]
    fn test_table_rows() {
        let txn = sample();
        let output = format_transaction_table(&[txn.clone()], &DisplayOptions::default());

        assert!(output.contains("Category"));
        assert!(output.contains("2025-01-15"));
        assert!(output.contains("-$42.50"));
        assert!(output.contains("team lunch"));
        assert!(output.contains(&short_id(&txn.id)));
    }

    #[test]
    fn test_details() {
        let output = format_transaction_details(&sample(), &DisplayOptions::default());
        assert!(output.contains("Type:        Expense"));
        assert!(output.contains("Amount:      $42.50"));
        assert!(output.contains("Note:        team lunch"));
    }
}
