//! Budget goal service
//!
//! Goals are created with zero spending; their `current` total then moves
//! with expense transactions (see `TransactionService`).

use tracing::info;

use crate::error::{FinanceError, FinanceResult};
use crate::models::{BudgetGoal, GoalPeriod, GoalProgress, Money};
use crate::storage::{keys, Storage};

/// Service for budget goal management
pub struct BudgetGoalService<'a> {
    storage: &'a Storage,
}

/// Changes to apply to a goal; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct GoalUpdate {
    pub category: Option<String>,
    pub limit: Option<Money>,
    pub period: Option<GoalPeriod>,
}

impl<'a> BudgetGoalService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a goal
    pub fn create(&self, category: &str, limit: Money, period: GoalPeriod) -> FinanceResult<BudgetGoal> {
        let goal = BudgetGoal::new(category.trim(), limit, period);
        goal.validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;

        self.storage.budget_goals.insert(goal.clone())?;
        self.storage.persist(keys::BUDGET_GOALS);

        info!(category = %goal.category, limit = goal.limit.cents(), "Created budget goal");
        Ok(goal)
    }

    pub fn find(&self, identifier: &str) -> FinanceResult<Option<BudgetGoal>> {
        self.storage.budget_goals.find(identifier)
    }

    pub fn get(&self, identifier: &str) -> FinanceResult<BudgetGoal> {
        self.find(identifier)?
            .ok_or_else(|| FinanceError::goal_not_found(identifier))
    }

    pub fn list(&self) -> FinanceResult<Vec<BudgetGoal>> {
        self.storage.budget_goals.get_all()
    }

    /// Progress for every goal
    pub fn progress(&self) -> FinanceResult<Vec<(BudgetGoal, GoalProgress)>> {
        Ok(self
            .list()?
            .into_iter()
            .map(|goal| {
                let progress = goal.progress();
                (goal, progress)
            })
            .collect())
    }

    /// Update a goal. Spending so far is kept.
    pub fn update(&self, identifier: &str, update: GoalUpdate) -> FinanceResult<BudgetGoal> {
        let mut goal = self.get(identifier)?;

        if let Some(category) = update.category {
            goal.category = category.trim().to_string();
        }
        if let Some(limit) = update.limit {
            goal.limit = limit;
        }
        if let Some(period) = update.period {
            goal.period = period;
        }

        goal.validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;

        if !self.storage.budget_goals.update(goal.clone())? {
            return Err(FinanceError::goal_not_found(identifier));
        }
        self.storage.persist(keys::BUDGET_GOALS);

        Ok(goal)
    }

    /// Set a goal's spending back to zero, e.g. at the start of a new period
    pub fn reset(&self, identifier: &str) -> FinanceResult<BudgetGoal> {
        let mut goal = self.get(identifier)?;
        goal.current = Money::zero();

        self.storage.budget_goals.update(goal.clone())?;
        self.storage.persist(keys::BUDGET_GOALS);

        info!(category = %goal.category, "Reset budget goal");
        Ok(goal)
    }

    pub fn delete(&self, identifier: &str) -> FinanceResult<BudgetGoal> {
        let goal = self.get(identifier)?;
        self.storage
            .budget_goals
            .remove(goal.id)?
            .ok_or_else(|| FinanceError::goal_not_found(identifier))?;
        self.storage.persist(keys::BUDGET_GOALS);

        info!(category = %goal.category, "Deleted budget goal");
        Ok(goal)
    }
}
