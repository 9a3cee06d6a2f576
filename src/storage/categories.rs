//! Category repository
//!
//! Persisted under the `categories` key in insertion order.

use std::sync::Arc;

use crate::error::FinanceError;
use crate::models::{Category, CategoryId};

use super::collection::JsonCollection;
use super::{keys, KeyValueStore};

pub struct CategoryRepository {
    records: JsonCollection<Category>,
}

impl CategoryRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            records: JsonCollection::new(keys::CATEGORIES, store),
        }
    }

    pub(crate) fn records(&self) -> &JsonCollection<Category> {
        &self.records
    }

    pub fn get(&self, id: CategoryId) -> Result<Option<Category>, FinanceError> {
        self.records.find(|c| c.id == id)
    }

    /// First category with this name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Category>, FinanceError> {
        let name = name.trim().to_lowercase();
        self.records.find(|c| c.name.to_lowercase() == name)
    }

    /// Look up by name first, then by full or abbreviated ID
    pub fn find(&self, identifier: &str) -> Result<Option<Category>, FinanceError> {
        if let Some(category) = self.get_by_name(identifier)? {
            return Ok(Some(category));
        }
        self.records
            .resolve(identifier, "Category", |c, ident| c.id.matches(ident))
    }

    pub fn get_all(&self) -> Result<Vec<Category>, FinanceError> {
        self.records.all()
    }

    pub fn insert(&self, category: Category) -> Result<(), FinanceError> {
        self.records.write()?.push(category);
        Ok(())
    }

    /// Replace the stored category with the same ID
    pub fn update(&self, category: Category) -> Result<bool, FinanceError> {
        let mut records = self.records.write()?;
        match records.iter_mut().find(|c| c.id == category.id) {
            Some(existing) => {
                *existing = category;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove(&self, id: CategoryId) -> Result<Option<Category>, FinanceError> {
        let mut records = self.records.write()?;
        Ok(records
            .iter()
            .position(|c| c.id == id)
            .map(|index| records.remove(index)))
    }

    pub fn replace_all(&self, categories: Vec<Category>) -> Result<(), FinanceError> {
        self.records.replace_all(categories)
    }

    pub fn count(&self) -> Result<usize, FinanceError> {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryType;
    use crate::storage::MemoryStore;

    #[test]
    fn test_find_by_name_or_id() {
        let repo = CategoryRepository::new(Arc::new(MemoryStore::new()));
        let food = Category::new("Food", "🍔", CategoryType::Expense);
        repo.insert(food.clone()).unwrap();

        assert_eq!(repo.find("food").unwrap().map(|c| c.id), Some(food.id));
        assert_eq!(
            repo.find(&food.id.to_string()).unwrap().map(|c| c.id),
            Some(food.id)
        );
        assert!(repo.find("Travel").unwrap().is_none());
    }

    #[test]
    fn test_update_and_remove() {
        let repo = CategoryRepository::new(Arc::new(MemoryStore::new()));
        let mut food = Category::new("Food", "🍔", CategoryType::Expense);
        repo.insert(food.clone()).unwrap();

        food.name = "Dining".into();
        assert!(repo.update(food.clone()).unwrap());
        assert_eq!(repo.get(food.id).unwrap().unwrap().name, "Dining");

        assert!(repo.remove(food.id).unwrap().is_some());
        assert!(!repo.update(food).unwrap());
    }
}
