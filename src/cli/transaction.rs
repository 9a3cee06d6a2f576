//! Transaction CLI commands

use clap::Subcommand;

use super::{parse_amount, parse_date, parse_optional_date};
use crate::clock::Clock;
use crate::config::Settings;
use crate::display::{format_transaction_details, format_transaction_table, DisplayOptions};
use crate::error::FinanceResult;
use crate::models::TransactionType;
use crate::services::{
    CreateTransactionInput, DateRangePreset, TransactionFilter, TransactionService, ALL_CATEGORIES,
};
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a new income or expense
    Add {
        /// income or expense
        kind: TransactionType,
        /// Amount (e.g., "12.50")
        amount: String,
        /// Category name
        category: String,
        /// Transaction date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        /// Free-form note
        #[arg(short, long)]
        note: Option<String>,
        /// Emoji (default: the category's)
        #[arg(short, long)]
        emoji: Option<String>,
    },

    /// List transactions, newest first
    List {
        /// Only this category
        #[arg(short, long, default_value = ALL_CATEGORIES)]
        category: String,
        /// Date range: last30Days, thisMonth, lastMonth, last3Months, thisYear, allTime
        #[arg(short, long, default_value = "last30Days")]
        range: String,
        /// Start of a custom range (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End of a custom range (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Only income or only expenses
        #[arg(short = 't', long = "type")]
        kind: Option<TransactionType>,
        /// Maximum number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show one transaction
    Show {
        /// Transaction ID (or a unique prefix)
        id: String,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID (or a unique prefix)
        id: String,
    },
}

/// Build a filter from list/summary style arguments.
///
/// Giving `--from` or `--to` switches to a custom range.
pub(crate) fn build_filter(
    category: &str,
    range: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> FinanceResult<TransactionFilter> {
    let start = parse_optional_date(from)?;
    let end = parse_optional_date(to)?;

    let mut filter = TransactionFilter::from_selection(category, range, start, end);
    if start.is_some() || end.is_some() {
        filter = filter.range(DateRangePreset::Custom);
    }
    Ok(filter)
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    clock: &dyn Clock,
    cmd: TransactionCommands,
) -> FinanceResult<()> {
    let service = TransactionService::new(storage).with_goal_matching(settings.goal_matching);
    let options = DisplayOptions::from_settings(settings);

    match cmd {
        TransactionCommands::Add {
            kind,
            amount,
            category,
            date,
            note,
            emoji,
        } => {
            let amount = parse_amount(&amount)?;
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => clock.today(),
            };

            let mut input = CreateTransactionInput::new(kind, amount, category, date);
            if let Some(note) = note {
                input = input.note(note);
            }
            if let Some(emoji) = emoji {
                input = input.emoji(emoji);
            }

            let txn = service.add(input)?;
            println!(
                "Added {} of {} in {} {}",
                txn.kind.as_str(),
                options.money(txn.amount),
                txn.emoji,
                txn.category
            );
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::List {
            category,
            range,
            from,
            to,
            kind,
            limit,
        } => {
            let mut filter = build_filter(&category, &range, from.as_deref(), to.as_deref())?;
            if let Some(kind) = kind {
                filter = filter.kind(kind);
            }

            let mut transactions = service.list(&filter, clock.today())?;
            let total = transactions.len();
            transactions.truncate(limit);

            print!("{}", format_transaction_table(&transactions, &options));
            if total > transactions.len() {
                println!("Showing {} of {} transactions.", transactions.len(), total);
            }
        }

        TransactionCommands::Show { id } => {
            let txn = service.get(&id)?;
            print!("{}", format_transaction_details(&txn, &options));
        }

        TransactionCommands::Delete { id } => {
            let txn = service.delete(&id)?;
            println!(
                "Deleted {} of {} in {} on {}",
                txn.kind.as_str(),
                options.money(txn.amount),
                txn.category,
                options.date(txn.date)
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_switches_to_custom() {
        let filter = build_filter(ALL_CATEGORIES, "thisMonth", Some("2025-01-01"), None).unwrap();
        assert_eq!(filter.range, DateRangePreset::Custom);
        assert!(filter.category.is_none());

        let filter = build_filter("Food", "lastMonth", None, None).unwrap();
        assert_eq!(filter.range, DateRangePreset::LastMonth);
        assert_eq!(filter.category.as_deref(), Some("Food"));
    }

    #[test]
    fn test_build_filter_rejects_bad_dates() {
        assert!(build_filter("Food", "allTime", Some("01/02/2025"), None)
            .unwrap_err()
            .is_validation());
    }
}
