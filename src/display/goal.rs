//! Budget goal display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::report::{format_bar, format_percentage};
use super::{short_id, DisplayOptions};
use crate::models::{BudgetGoal, GoalProgress};

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Goal")]
    category: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Progress")]
    progress: String,
}

/// Format goals with their progress as a table
pub fn format_goal_table(goals: &[(BudgetGoal, GoalProgress)], options: &DisplayOptions) -> String {
    if goals.is_empty() {
        return "No budget goals found.\n".to_string();
    }

    let rows = goals.iter().map(|(goal, progress)| {
        let marker = if progress.over_limit { " over" } else { "" };
        GoalRow {
            id: short_id(&goal.id),
            category: goal.category.clone(),
            period: goal.period.to_string(),
            spent: options.money(progress.spent),
            limit: options.money(progress.limit),
            remaining: options.money(progress.remaining),
            progress: format!(
                "{} {}{}",
                format_bar(progress.percent.min(100.0), 100.0, 10),
                format_percentage(progress.percent),
                marker
            ),
        }
    });
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoalPeriod, Money};

    #[test]
    fn test_goal_table_marks_over_limit() {
        let mut goal = BudgetGoal::new("Food Budget", Money::from_cents(10_000), GoalPeriod::Monthly);
        goal.record_expense(Money::from_cents(12_000));
        let progress = goal.progress();

        let output = format_goal_table(&[(goal, progress)], &DisplayOptions::default());
        assert!(output.contains("Food Budget"));
        assert!(output.contains("$120.00"));
        assert!(output.contains("120% over"));
    }
}
