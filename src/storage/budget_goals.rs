//! Budget goal repository
//!
//! Persisted under the `budgetGoals` key.

use std::sync::Arc;

use crate::error::FinanceError;
use crate::models::{BudgetGoal, BudgetGoalId, GoalMatching, Money};

use super::collection::JsonCollection;
use super::{keys, KeyValueStore};

pub struct BudgetGoalRepository {
    records: JsonCollection<BudgetGoal>,
}

impl BudgetGoalRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            records: JsonCollection::new(keys::BUDGET_GOALS, store),
        }
    }

    pub(crate) fn records(&self) -> &JsonCollection<BudgetGoal> {
        &self.records
    }

    pub fn get(&self, id: BudgetGoalId) -> Result<Option<BudgetGoal>, FinanceError> {
        self.records.find(|g| g.id == id)
    }

    /// Look up by goal category (case-insensitive), then by ID
    pub fn find(&self, identifier: &str) -> Result<Option<BudgetGoal>, FinanceError> {
        let lowered = identifier.trim().to_lowercase();
        if let Some(goal) = self.records.find(|g| g.category.to_lowercase() == lowered)? {
            return Ok(Some(goal));
        }
        self.records
            .resolve(identifier, "Budget goal", |g, ident| g.id.matches(ident))
    }

    pub fn get_all(&self) -> Result<Vec<BudgetGoal>, FinanceError> {
        self.records.all()
    }

    pub fn insert(&self, goal: BudgetGoal) -> Result<(), FinanceError> {
        self.records.write()?.push(goal);
        Ok(())
    }

    pub fn update(&self, goal: BudgetGoal) -> Result<bool, FinanceError> {
        let mut records = self.records.write()?;
        match records.iter_mut().find(|g| g.id == goal.id) {
            Some(existing) => {
                *existing = goal;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove(&self, id: BudgetGoalId) -> Result<Option<BudgetGoal>, FinanceError> {
        let mut records = self.records.write()?;
        Ok(records
            .iter()
            .position(|g| g.id == id)
            .map(|index| records.remove(index)))
    }

    /// Apply an expense to every goal tracking `category`.
    ///
    /// Returns the number of goals touched.
    pub fn apply_expense(
        &self,
        category: &str,
        amount: Money,
        matching: GoalMatching,
    ) -> Result<usize, FinanceError> {
        let mut records = self.records.write()?;
        let mut touched = 0;
        for goal in records.iter_mut().filter(|g| g.tracks(category, matching)) {
            goal.record_expense(amount);
            touched += 1;
        }
        Ok(touched)
    }

    /// Undo an expense on every goal tracking `category`, clamped at zero
    pub fn rollback_expense(
        &self,
        category: &str,
        amount: Money,
        matching: GoalMatching,
    ) -> Result<usize, FinanceError> {
        let mut records = self.records.write()?;
        let mut touched = 0;
        for goal in records.iter_mut().filter(|g| g.tracks(category, matching)) {
            goal.rollback_expense(amount);
            touched += 1;
        }
        Ok(touched)
    }

    pub fn replace_all(&self, goals: Vec<BudgetGoal>) -> Result<(), FinanceError> {
        self.records.replace_all(goals)
    }

    pub fn count(&self) -> Result<usize, FinanceError> {
        self.records.len()
    }
}
