//! Core data models for fintrack
//!
//! Transactions, categories, budget goals and recurring transaction
//! definitions, plus the money and id types they share.

pub mod budget_goal;
pub mod category;
pub mod ids;
pub mod money;
pub mod recurring;
pub mod transaction;

pub use budget_goal::{
    BudgetGoal, GoalMatching, GoalPeriod, GoalProgress, GOAL_SUFFIX, MONTHLY_EXPENSES_GOAL,
};
pub use category::{Category, CategoryType, DEFAULT_EMOJI};
pub use ids::{BudgetGoalId, CategoryId, RecurringId, TransactionId};
pub use money::{Money, MoneyFormat, SymbolPosition};
pub use recurring::{Frequency, RecurringTransaction};
pub use transaction::{Transaction, TransactionType};
