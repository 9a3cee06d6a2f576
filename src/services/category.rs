//! Category service
//!
//! Creating, renaming and removing categories. Transactions keep the category
//! name they were recorded with, so edits here never rewrite history.

use tracing::info;

use crate::error::{FinanceError, FinanceResult};
use crate::models::{Category, CategoryType, TransactionType, DEFAULT_EMOJI};
use crate::storage::{keys, Storage};

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

/// Changes to apply to a category; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub emoji: Option<String>,
    pub kind: Option<CategoryType>,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new category
    pub fn create(&self, name: &str, emoji: Option<&str>, kind: CategoryType) -> FinanceResult<Category> {
        let emoji = emoji
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_EMOJI);
        let category = Category::new(name.trim(), emoji, kind);

        category
            .validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;

        self.storage.categories.insert(category.clone())?;
        self.storage.persist(keys::CATEGORIES);

        info!(name = %category.name, "Created category");
        Ok(category)
    }

    /// Find a category by name or ID
    pub fn find(&self, identifier: &str) -> FinanceResult<Option<Category>> {
        self.storage.categories.find(identifier)
    }

    pub fn get(&self, identifier: &str) -> FinanceResult<Category> {
        self.find(identifier)?
            .ok_or_else(|| FinanceError::category_not_found(identifier))
    }

    /// List all categories in insertion order
    pub fn list(&self) -> FinanceResult<Vec<Category>> {
        self.storage.categories.get_all()
    }

    /// Categories offered for a transaction type
    pub fn list_for(&self, kind: TransactionType) -> FinanceResult<Vec<Category>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|c| c.kind.applies_to(kind))
            .collect())
    }

    /// Update a category
    pub fn update(&self, identifier: &str, update: CategoryUpdate) -> FinanceResult<Category> {
        let mut category = self.get(identifier)?;

        if let Some(name) = update.name {
            category.name = name.trim().to_string();
        }
        if let Some(emoji) = update.emoji {
            category.emoji = emoji.trim().to_string();
        }
        if let Some(kind) = update.kind {
            category.kind = kind;
        }

        category
            .validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;

        if !self.storage.categories.update(category.clone())? {
            return Err(FinanceError::category_not_found(identifier));
        }
        self.storage.persist(keys::CATEGORIES);

        Ok(category)
    }

    /// Delete a category. Transactions that use its name are left alone.
    pub fn delete(&self, identifier: &str) -> FinanceResult<Category> {
        let category = self.get(identifier)?;
        self.storage
            .categories
            .remove(category.id)?
            .ok_or_else(|| FinanceError::category_not_found(identifier))?;
        self.storage.persist(keys::CATEGORIES);

        info!(name = %category.name, "Deleted category");
        Ok(category)
    }
}
