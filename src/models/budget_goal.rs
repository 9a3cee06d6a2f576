//! Budget goal model
//!
//! A budget goal caps spending for a category over a period and keeps a
//! running `current` total that moves as expenses are added and deleted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::BudgetGoalId;
use super::money::Money;
use crate::error::FinanceError;

/// Goal category that tracks every expense regardless of its category
pub const MONTHLY_EXPENSES_GOAL: &str = "Monthly Expenses";

/// Suffix a goal category carries under the naming convention
pub const GOAL_SUFFIX: &str = " Budget";

/// Period a goal's limit applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl fmt::Display for GoalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => write!(f, "Weekly"),
            Self::Monthly => write!(f, "Monthly"),
            Self::Yearly => write!(f, "Yearly"),
        }
    }
}

impl FromStr for GoalPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(format!("Unknown goal period '{}'", other)),
        }
    }
}

/// Rule deciding which goals an expense counts toward.
///
/// `Convention`: the goal category is `"Monthly Expenses"` or exactly
/// `"<expense category> Budget"`.
/// `ExactCategory`: the goal category equals the expense category, or is
/// `"Monthly Expenses"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum GoalMatching {
    #[default]
    Convention,
    ExactCategory,
}

impl FromStr for GoalMatching {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "convention" => Ok(Self::Convention),
            "exactcategory" | "exact" => Ok(Self::ExactCategory),
            other => Err(FinanceError::Validation(format!(
                "Unknown goal matching rule '{}'. Use convention or exact-category",
                other
            ))),
        }
    }
}

impl fmt::Display for GoalMatching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Convention => write!(f, "convention"),
            Self::ExactCategory => write!(f, "exact-category"),
        }
    }
}

/// A spending cap with running total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetGoal {
    pub id: BudgetGoalId,
    pub category: String,
    pub limit: Money,
    #[serde(default)]
    pub current: Money,
    #[serde(default)]
    pub period: GoalPeriod,
}

/// Derived view of a goal's state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalProgress {
    pub spent: Money,
    pub limit: Money,
    /// Zero once the limit is reached
    pub remaining: Money,
    /// Spent as a percentage of the limit
    pub percent: f64,
    pub over_limit: bool,
}

impl BudgetGoal {
    pub fn new(category: impl Into<String>, limit: Money, period: GoalPeriod) -> Self {
        Self {
            id: BudgetGoalId::new(),
            category: category.into(),
            limit,
            current: Money::zero(),
            period,
        }
    }

    /// Whether an expense in `category` counts toward this goal
    pub fn tracks(&self, category: &str, matching: GoalMatching) -> bool {
        if self.category == MONTHLY_EXPENSES_GOAL {
            return true;
        }
        match matching {
            GoalMatching::Convention => self
                .category
                .strip_suffix(GOAL_SUFFIX)
                .is_some_and(|base| base == category),
            GoalMatching::ExactCategory => self.category == category,
        }
    }

    pub fn record_expense(&mut self, amount: Money) {
        self.current += amount;
    }

    /// Undo a recorded expense, never dropping below zero
    pub fn rollback_expense(&mut self, amount: Money) {
        self.current = self.current.saturating_sub_to_zero(amount);
    }

    pub fn progress(&self) -> GoalProgress {
        let percent = if self.limit.is_positive() {
            self.current.as_f64() / self.limit.as_f64() * 100.0
        } else {
            0.0
        };
        GoalProgress {
            spent: self.current,
            limit: self.limit,
            remaining: self.limit.saturating_sub_to_zero(self.current),
            percent,
            over_limit: self.current > self.limit,
        }
    }

    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.category.trim().is_empty() {
            return Err(GoalValidationError::EmptyCategory);
        }
        if !self.limit.is_positive() {
            return Err(GoalValidationError::NonPositiveLimit(self.limit));
        }
        if !self.limit.in_range() || !self.current.in_range() {
            return Err(GoalValidationError::AmountTooLarge);
        }
        if self.current.is_negative() {
            return Err(GoalValidationError::NegativeCurrent(self.current));
        }
        Ok(())
    }
}

/// Validation errors for budget goals
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyCategory,
    NonPositiveLimit(Money),
    NegativeCurrent(Money),
    AmountTooLarge,
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCategory => write!(f, "Goal category cannot be empty"),
            Self::NonPositiveLimit(limit) => {
                write!(f, "Goal limit must be greater than zero (got {})", limit)
            }
            Self::NegativeCurrent(current) => {
                write!(f, "Goal spending cannot be negative (got {})", current)
            }
            Self::AmountTooLarge => {
                write!(f, "Goal amounts cannot be larger than {}", Money::MAX)
            }
        }
    }
}

impl std::error::Error for GoalValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(category: &str) -> BudgetGoal {
        BudgetGoal::new(category, Money::from_cents(500_000), GoalPeriod::Monthly)
    }

    #[test]
    fn test_convention_matching() {
        let m = GoalMatching::Convention;
        assert!(goal("Food Budget").tracks("Food", m));
        assert!(goal(MONTHLY_EXPENSES_GOAL).tracks("Food", m));
        assert!(!goal("Food").tracks("Food", m));
        assert!(!goal("Food Budget").tracks("Fast Food", m));
        assert!(!goal("Transport Budget").tracks("Food", m));
    }

    #[test]
    fn test_exact_category_matching() {
        let m = GoalMatching::ExactCategory;
        assert!(goal("Food").tracks("Food", m));
        assert!(goal(MONTHLY_EXPENSES_GOAL).tracks("Food", m));
        assert!(!goal("Food Budget").tracks("Food", m));
    }

    #[test]
    fn test_rollback_clamps_at_zero() {
        let mut g = goal("Food Budget");
        g.record_expense(Money::from_cents(300));
        g.rollback_expense(Money::from_cents(1000));
        assert_eq!(g.current, Money::zero());
    }

    #[test]
    fn test_progress() {
        let mut g = BudgetGoal::new("Food Budget", Money::from_cents(10_000), GoalPeriod::Weekly);
        g.record_expense(Money::from_cents(2_500));
        let progress = g.progress();
        assert_eq!(progress.remaining, Money::from_cents(7_500));
        assert!((progress.percent - 25.0).abs() < f64::EPSILON);
        assert!(!progress.over_limit);

        g.record_expense(Money::from_cents(10_000));
        let progress = g.progress();
        assert_eq!(progress.remaining, Money::zero());
        assert!(progress.over_limit);
    }

    #[test]
    fn test_validation() {
        assert!(goal("Food Budget").validate().is_ok());
        assert_eq!(
            BudgetGoal::new("Food", Money::zero(), GoalPeriod::Monthly).validate(),
            Err(GoalValidationError::NonPositiveLimit(Money::zero()))
        );
        assert_eq!(goal(" ").validate(), Err(GoalValidationError::EmptyCategory));

        let huge = BudgetGoal::new("Food Budget", Money::from_cents(i64::MAX), GoalPeriod::Monthly);
        assert_eq!(huge.validate(), Err(GoalValidationError::AmountTooLarge));
    }

    #[test]
    fn test_record_expense_saturates() {
        let mut g = goal("Food Budget");
        g.current = Money::from_cents(i64::MAX - 10);
        g.record_expense(Money::MAX);
        assert_eq!(g.current, Money::from_cents(i64::MAX));
    }

    #[test]
    fn test_goal_matching_from_str() {
        assert_eq!("convention".parse::<GoalMatching>().unwrap(), GoalMatching::Convention);
        assert_eq!(
            "exact-category".parse::<GoalMatching>().unwrap(),
            GoalMatching::ExactCategory
        );
        assert!("fuzzy".parse::<GoalMatching>().is_err());
    }
}
