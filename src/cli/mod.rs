//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod category;
pub mod config;
pub mod export;
pub mod goal;
pub mod import;
pub mod recurring;
pub mod summary;
pub mod transaction;

use chrono::NaiveDate;

use crate::error::{FinanceError, FinanceResult};
use crate::models::Money;

pub use category::{handle_category_command, CategoryCommands};
pub use config::{handle_config_command, ConfigCommands};
pub use export::{handle_export_command, ExportCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use import::{handle_import_command, ImportArgs};
pub use recurring::{handle_recurring_command, RecurringCommands};
pub use summary::{handle_summary_command, SummaryArgs};
pub use transaction::{handle_transaction_command, TransactionCommands};

/// Parse a user-entered amount such as `12.50` or `$1,200`
pub(crate) fn parse_amount(value: &str) -> FinanceResult<Money> {
    Money::parse(value).map_err(|e| FinanceError::Validation(format!("Invalid amount: {}", e)))
}

/// Parse a `YYYY-MM-DD` date argument
pub(crate) fn parse_date(value: &str) -> FinanceResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        FinanceError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD", value))
    })
}

pub(crate) fn parse_optional_date(value: Option<&str>) -> FinanceResult<Option<NaiveDate>> {
    value.map(parse_date).transpose()
}
