//! Transaction model
//!
//! A transaction is a single income or expense entry. Transactions are
//! immutable once created; the only way to change one is to delete it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::TransactionId;
use super::money::Money;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Ok(Self::Income),
            "expense" | "out" => Ok(Self::Expense),
            other => Err(format!("Unknown transaction type '{}'", other)),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Always positive; direction comes from `kind`
    pub amount: Money,

    /// Category name (categories are referenced by name, not id)
    pub category: String,

    #[serde(default)]
    pub emoji: String,

    pub date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        kind: TransactionType,
        amount: Money,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            kind,
            amount,
            category: category.into(),
            emoji: String::new(),
            date,
            note: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = emoji.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        self.note = if note.trim().is_empty() { None } else { Some(note) };
        self
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// Amount with sign applied: positive for income, negative for expenses
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }
        if !self.amount.in_range() {
            return Err(TransactionValidationError::AmountTooLarge(self.amount));
        }

        if self.category.trim().is_empty() {
            return Err(TransactionValidationError::MissingCategory);
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.category,
            self.signed_amount()
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(Money),
    AmountTooLarge(Money),
    MissingCategory,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be greater than zero (got {})", amount)
            }
            Self::AmountTooLarge(amount) => {
                write!(f, "Amount {} is larger than the maximum {}", amount, Money::MAX)
            }
            Self::MissingCategory => write!(f, "Transaction category is required"),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_new_transaction() {
        let txn = Transaction::new(
            TransactionType::Expense,
            Money::from_cents(5000),
            "Food",
            date(),
        )
        .with_emoji("🍔")
        .with_note("lunch");

        assert_eq!(txn.category, "Food");
        assert_eq!(txn.emoji, "🍔");
        assert_eq!(txn.note.as_deref(), Some("lunch"));
        assert!(txn.is_expense());
        assert_eq!(txn.signed_amount(), Money::from_cents(-5000));
    }

    #[test]
    fn test_blank_note_is_dropped() {
        let txn = Transaction::new(TransactionType::Income, Money::from_cents(1), "Salary", date())
            .with_note("   ");
        assert_eq!(txn.note, None);
    }

    #[test]
    fn test_validation() {
        let zero = Transaction::new(TransactionType::Expense, Money::zero(), "Food", date());
        assert!(matches!(
            zero.validate(),
            Err(TransactionValidationError::NonPositiveAmount(_))
        ));

        let no_category =
            Transaction::new(TransactionType::Expense, Money::from_cents(100), " ", date());
        assert_eq!(
            no_category.validate(),
            Err(TransactionValidationError::MissingCategory)
        );

        let huge = Transaction::new(TransactionType::Income, Money::from_cents(i64::MAX), "Salary", date());
        assert!(matches!(
            huge.validate(),
            Err(TransactionValidationError::AmountTooLarge(_))
        ));
        let largest = Transaction::new(TransactionType::Income, Money::MAX, "Salary", date());
        assert!(largest.validate().is_ok());
    }

    #[test]
    fn test_serialized_field_names() {
        let txn = Transaction::new(TransactionType::Income, Money::from_cents(250_000), "Salary", date());
        let value = serde_json::to_value(&txn).unwrap();

        assert_eq!(value["type"], "income");
        assert_eq!(value["amount"], 250_000);
        assert_eq!(value["date"], "2025-01-15");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("note").is_none());
    }

    #[test]
    fn test_type_from_str() {
        assert_eq!("Income".parse::<TransactionType>(), Ok(TransactionType::Income));
        assert_eq!("expense".parse::<TransactionType>(), Ok(TransactionType::Expense));
        assert!("transfer".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_display() {
        let txn = Transaction::new(TransactionType::Expense, Money::from_cents(5000), "Food", date());
        assert_eq!(format!("{}", txn), "2025-01-15 Food -$50.00");
    }
}
