//! Budget Goal Report
//!
//! Progress of every budget goal against its limit.

use crate::models::{BudgetGoal, GoalPeriod, GoalProgress, Money, MoneyFormat};

/// A row in the goal report
#[derive(Debug, Clone)]
pub struct GoalReportRow {
    pub category: String,
    pub period: GoalPeriod,
    pub progress: GoalProgress,
}

impl GoalReportRow {
    pub fn is_over_limit(&self) -> bool {
        self.progress.over_limit
    }
}

/// Budget Goal Report
#[derive(Debug, Clone)]
pub struct GoalReport {
    pub rows: Vec<GoalReportRow>,
    pub total_limit: Money,
    pub total_spent: Money,
}

impl GoalReport {
    pub fn generate(goals: &[BudgetGoal]) -> Self {
        let rows: Vec<GoalReportRow> = goals
            .iter()
            .map(|goal| GoalReportRow {
                category: goal.category.clone(),
                period: goal.period,
                progress: goal.progress(),
            })
            .collect();

        let total_limit = goals.iter().map(|g| g.limit).sum();
        let total_spent = goals.iter().map(|g| g.current).sum();

        Self {
            rows,
            total_limit,
            total_spent,
        }
    }

    pub fn over_limit(&self) -> impl Iterator<Item = &GoalReportRow> {
        self.rows.iter().filter(|r| r.is_over_limit())
    }

    pub fn format_terminal(&self, money: &MoneyFormat) -> String {
        let mut output = String::new();

        output.push_str("Budget Goals\n");
        output.push_str(&"=".repeat(72));
        output.push('\n');
        output.push_str(&format!(
            "{:<24} {:<8} {:>12} {:>12} {:>12}\n",
            "Goal", "Period", "Spent", "Limit", "Progress"
        ));
        output.push_str(&"-".repeat(72));
        output.push('\n');

        for row in &self.rows {
            let marker = if row.is_over_limit() { " !" } else { "" };
            output.push_str(&format!(
                "{:<24} {:<8} {:>12} {:>12} {:>11.1}%{}\n",
                row.category,
                row.period.to_string(),
                row.progress.spent.format(money),
                row.progress.limit.format(money),
                row.progress.percent,
                marker
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_report() {
        let mut food = BudgetGoal::new("Food Budget", Money::from_cents(10_000), GoalPeriod::Monthly);
        food.record_expense(Money::from_cents(12_000));
        let rent = BudgetGoal::new("Housing Budget", Money::from_cents(90_000), GoalPeriod::Monthly);

        let report = GoalReport::generate(&[food, rent]);

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.total_limit, Money::from_cents(100_000));
        assert_eq!(report.total_spent, Money::from_cents(12_000));
        assert_eq!(report.over_limit().count(), 1);
        assert!(report.format_terminal(&MoneyFormat::default()).contains("Food Budget"));
    }
}
