//! Category model
//!
//! Categories label transactions. Transactions refer to a category by its
//! name, so renaming a category does not rewrite existing transactions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::CategoryId;
use super::transaction::TransactionType;

/// Emoji used when neither the caller nor the category provides one
pub const DEFAULT_EMOJI: &str = "💰";

/// Which kind of transaction a category is offered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Income,
    Expense,
    Both,
}

impl CategoryType {
    pub fn applies_to(&self, kind: TransactionType) -> bool {
        match self {
            Self::Both => true,
            Self::Income => kind == TransactionType::Income,
            Self::Expense => kind == TransactionType::Expense,
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
            Self::Both => write!(f, "Both"),
        }
    }
}

impl FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "both" => Ok(Self::Both),
            other => Err(format!("Unknown category type '{}'", other)),
        }
    }
}

/// A transaction category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
}

impl Category {
    pub fn new(name: impl Into<String>, emoji: impl Into<String>, kind: CategoryType) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            emoji: emoji.into(),
            kind,
        }
    }

    /// The categories a fresh installation starts with
    pub fn defaults() -> Vec<Category> {
        [
            ("Salary", "💼", CategoryType::Income),
            ("Freelance", "💻", CategoryType::Income),
            ("Investments", "📈", CategoryType::Income),
            ("Food", "🍔", CategoryType::Expense),
            ("Groceries", "🛒", CategoryType::Expense),
            ("Transport", "🚗", CategoryType::Expense),
            ("Housing", "🏠", CategoryType::Expense),
            ("Utilities", "💡", CategoryType::Expense),
            ("Entertainment", "🎬", CategoryType::Expense),
            ("Health", "💊", CategoryType::Expense),
            ("Shopping", "🛍️", CategoryType::Expense),
            ("Gifts", "🎁", CategoryType::Both),
            ("Other", DEFAULT_EMOJI, CategoryType::Both),
        ]
        .into_iter()
        .map(|(name, emoji, kind)| Category::new(name, emoji, kind))
        .collect()
    }

    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.chars().count() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.chars().count()));
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.emoji.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} {}", self.emoji, self.name)
        }
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applies_to() {
        assert!(CategoryType::Both.applies_to(TransactionType::Income));
        assert!(CategoryType::Expense.applies_to(TransactionType::Expense));
        assert!(!CategoryType::Income.applies_to(TransactionType::Expense));
    }

    #[test]
    fn test_validation() {
        assert!(Category::new("Food", "🍔", CategoryType::Expense).validate().is_ok());
        assert_eq!(
            Category::new("  ", "", CategoryType::Both).validate(),
            Err(CategoryValidationError::EmptyName)
        );
        assert!(matches!(
            Category::new("x".repeat(51), "", CategoryType::Both).validate(),
            Err(CategoryValidationError::NameTooLong(51))
        ));
    }

    #[test]
    fn test_defaults_are_valid() {
        let defaults = Category::defaults();
        assert!(defaults.iter().all(|c| c.validate().is_ok()));
        assert!(defaults.iter().any(|c| c.name == "Food"));
    }

    #[test]
    fn test_serialization_uses_type_key() {
        let category = Category::new("Salary", "💼", CategoryType::Income);
        let value = serde_json::to_value(&category).unwrap();
        assert_eq!(value["type"], "income");

        let back: Category = serde_json::from_value(value).unwrap();
        assert_eq!(back, category);
    }
}
