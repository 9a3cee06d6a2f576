//! Recurring transaction model
//!
//! A recurring transaction is a template that materializes into ordinary
//! transactions. It moves between two states, active and paused; processing
//! an active definition advances `next_date` by one frequency interval.

use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::RecurringId;
use super::money::Money;
use super::transaction::TransactionType;

/// How often a recurring transaction repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// The date one interval after `from`.
    ///
    /// Month-based frequencies are calendar aware: when the target month is
    /// shorter, the result is clamped to its last day (Jan 31 + 1 month is
    /// Feb 28, or Feb 29 in a leap year). Returns `None` only when the result
    /// falls outside the representable date range.
    pub fn advance(&self, from: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Daily => from.checked_add_days(Days::new(1)),
            Self::Weekly => from.checked_add_days(Days::new(7)),
            Self::Biweekly => from.checked_add_days(Days::new(14)),
            Self::Monthly => from.checked_add_months(Months::new(1)),
            Self::Quarterly => from.checked_add_months(Months::new(3)),
            Self::Yearly => from.checked_add_months(Months::new(12)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Biweekly => "Every 2 weeks",
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
            Self::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "biweekly" | "bi-weekly" | "fortnightly" => Ok(Self::Biweekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" | "annually" => Ok(Self::Yearly),
            other => Err(format!("Unknown frequency '{}'", other)),
        }
    }
}

/// A recurring transaction definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTransaction {
    pub id: RecurringId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Money,
    pub category: String,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub next_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_processed: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl RecurringTransaction {
    /// Create an active definition whose first occurrence is `start_date`
    pub fn new(
        name: impl Into<String>,
        kind: TransactionType,
        amount: Money,
        category: impl Into<String>,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: RecurringId::new(),
            name: name.into(),
            kind,
            amount,
            category: category.into(),
            frequency,
            start_date,
            next_date: start_date,
            end_date: None,
            note: None,
            active: true,
            created_at: Utc::now(),
            last_processed: None,
        }
    }

    pub fn toggle(&mut self) {
        self.active = !self.active;
    }

    /// Whether `date` is still inside the definition's lifetime
    pub fn within_end(&self, date: NaiveDate) -> bool {
        self.end_date.map_or(true, |end| date <= end)
    }

    /// Active, not past its end date and scheduled on or before `today`
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.active && self.next_date <= today && self.within_end(self.next_date)
    }

    /// Note attached to materialized transactions
    pub fn materialized_note(&self) -> String {
        match self.note.as_deref().map(str::trim) {
            Some(note) if !note.is_empty() => format!("Recurring: {} ({})", self.name, note),
            _ => format!("Recurring: {}", self.name),
        }
    }

    /// Scheduled dates from `next_date` up to and including `until`
    pub fn occurrences_until(&self, until: NaiveDate, limit: usize) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let mut date = self.next_date;
        while dates.len() < limit && date <= until && self.within_end(date) {
            dates.push(date);
            match self.frequency.advance(date) {
                Some(next) => date = next,
                None => break,
            }
        }
        dates
    }

    pub fn validate(&self) -> Result<(), RecurringValidationError> {
        if self.name.trim().is_empty() {
            return Err(RecurringValidationError::EmptyName);
        }
        if !self.amount.is_positive() {
            return Err(RecurringValidationError::NonPositiveAmount(self.amount));
        }
        if !self.amount.in_range() {
            return Err(RecurringValidationError::AmountTooLarge(self.amount));
        }
        if self.category.trim().is_empty() {
            return Err(RecurringValidationError::MissingCategory);
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(RecurringValidationError::EndBeforeStart {
                    start: self.start_date,
                    end,
                });
            }
        }
        Ok(())
    }
}

/// Validation errors for recurring transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurringValidationError {
    EmptyName,
    NonPositiveAmount(Money),
    AmountTooLarge(Money),
    MissingCategory,
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for RecurringValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Recurring transaction name cannot be empty"),
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be greater than zero (got {})", amount)
            }
            Self::AmountTooLarge(amount) => {
                write!(f, "Amount {} is larger than the maximum {}", amount, Money::MAX)
            }
            Self::MissingCategory => write!(f, "Recurring transaction category is required"),
            Self::EndBeforeStart { start, end } => {
                write!(f, "End date {} is before start date {}", end, start)
            }
        }
    }
}

impl std::error::Error for RecurringValidationError {}
