//! Display formatting for terminal output
//!
//! Turns models and reports into tables and text blocks for the CLI. Money
//! and dates follow the user's currency, locale and date format settings.

pub mod category;
pub mod goal;
pub mod recurring;
pub mod report;
pub mod transaction;

use std::fmt::Write;

use chrono::NaiveDate;

use crate::config::Settings;
use crate::models::{Money, MoneyFormat};

pub use category::format_category_table;
pub use goal::format_goal_table;
pub use recurring::{format_due_report, format_recurring_table, format_upcoming_table};
pub use report::{format_summary, format_totals};
pub use transaction::{format_transaction_details, format_transaction_table};

/// How money and dates are rendered
#[derive(Debug, Clone)]
pub struct DisplayOptions {
    pub money: MoneyFormat,
    /// strftime pattern
    pub date_format: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            money: MoneyFormat::default(),
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

impl DisplayOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            money: settings.money_format(),
            date_format: settings.date_format.clone(),
        }
    }

    pub fn money(&self, amount: Money) -> String {
        amount.format(&self.money)
    }

    /// Format a date, falling back to ISO when the pattern is invalid
    pub fn date(&self, date: NaiveDate) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.format(&self.date_format)).is_err() {
            return date.format("%Y-%m-%d").to_string();
        }
        out
    }
}

/// First eight characters of an id, enough to refer to it on the command line
pub fn short_id(id: &impl ToString) -> String {
    id.to_string().chars().take(8).collect()
}

/// Shorten text to `max` characters, marking the cut with an ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
