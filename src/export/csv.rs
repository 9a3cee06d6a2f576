//! CSV Export functionality
//!
//! Writes transactions in one of two layouts. Both are readable by
//! `ImportService::import_csv`.

use std::io::Write;
use std::str::FromStr;

use crate::error::{FinanceError, FinanceResult};
use crate::models::Transaction;
use crate::storage::Storage;

/// Header of the basic layout
pub const BASIC_HEADER: [&str; 5] = ["Type", "Category", "Amount", "Date", "Note"];

/// Header of the detailed layout
pub const DETAILED_HEADER: [&str; 8] = [
    "ID",
    "Type",
    "Category",
    "Emoji",
    "Amount",
    "Date",
    "Note",
    "Created At",
];

/// Which columns to write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CsvLayout {
    #[default]
    Basic,
    Detailed,
}

impl FromStr for CsvLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "detailed" | "full" => Ok(Self::Detailed),
            other => Err(format!("Unknown CSV layout '{}'. Use basic or detailed", other)),
        }
    }
}

/// Amounts are written as plain decimals so spreadsheets can sum them.
/// Built from integer cents so large amounts keep every digit.
fn amount_field(txn: &Transaction) -> String {
    let amount = txn.amount;
    let sign = if amount.is_negative() { "-" } else { "" };
    format!("{}{}.{:02}", sign, amount.units().unsigned_abs(), amount.cents_part())
}

/// Write the given transactions as CSV
pub fn write_transactions_csv<W: Write>(
    transactions: &[Transaction],
    layout: CsvLayout,
    writer: W,
) -> FinanceResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let to_export = |e: csv::Error| FinanceError::Export(e.to_string());

    match layout {
        CsvLayout::Basic => csv_writer.write_record(BASIC_HEADER).map_err(to_export)?,
        CsvLayout::Detailed => csv_writer.write_record(DETAILED_HEADER).map_err(to_export)?,
    }

    for txn in transactions {
        let note = txn.note.as_deref().unwrap_or("");
        let date = txn.date.format("%Y-%m-%d").to_string();
        let amount = amount_field(txn);

        match layout {
            CsvLayout::Basic => csv_writer
                .write_record([
                    txn.kind.as_str(),
                    txn.category.as_str(),
                    amount.as_str(),
                    date.as_str(),
                    note,
                ])
                .map_err(to_export)?,
            CsvLayout::Detailed => csv_writer
                .write_record([
                    txn.id.as_uuid().to_string().as_str(),
                    txn.kind.as_str(),
                    txn.category.as_str(),
                    txn.emoji.as_str(),
                    amount.as_str(),
                    date.as_str(),
                    note,
                    txn.created_at.to_rfc3339().as_str(),
                ])
                .map_err(to_export)?,
        }
    }

    csv_writer
        .flush()
        .map_err(|e| FinanceError::Export(e.to_string()))?;
    Ok(())
}

/// Export all stored transactions, newest first
pub fn export_transactions_csv<W: Write>(
    storage: &Storage,
    layout: CsvLayout,
    writer: W,
) -> FinanceResult<()> {
    let mut transactions = storage.transactions.get_all()?;
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
    write_transactions_csv(&transactions, layout, writer)
}
