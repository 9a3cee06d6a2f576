//! Budget goal CLI commands

use clap::Subcommand;

use super::parse_amount;
use crate::config::Settings;
use crate::display::{format_goal_table, DisplayOptions};
use crate::error::FinanceResult;
use crate::models::{GoalMatching, GoalPeriod, GOAL_SUFFIX, MONTHLY_EXPENSES_GOAL};
use crate::services::{BudgetGoalService, GoalUpdate};
use crate::storage::Storage;

/// Budget goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a spending goal
    #[command(after_help = "Expenses count toward a goal named \"<Category> Budget\" \
                            and toward a goal named \"Monthly Expenses\".")]
    Add {
        /// Goal name, e.g. "Food Budget" or "Monthly Expenses"
        category: String,
        /// Spending limit (e.g., "400")
        limit: String,
        /// weekly, monthly or yearly
        #[arg(short, long, default_value = "monthly")]
        period: GoalPeriod,
    },

    /// List goals with their progress
    List,

    /// Edit a goal (spending so far is kept)
    Edit {
        /// Goal name or ID
        goal: String,
        /// New goal name
        #[arg(short, long)]
        category: Option<String>,
        /// New limit
        #[arg(short, long)]
        limit: Option<String>,
        /// New period
        #[arg(short, long)]
        period: Option<GoalPeriod>,
    },

    /// Delete a goal
    Delete {
        /// Goal name or ID
        goal: String,
    },

    /// Set a goal's spending back to zero
    Reset {
        /// Goal name or ID
        goal: String,
    },
}

/// Handle a goal command
pub fn handle_goal_command(storage: &Storage, settings: &Settings, cmd: GoalCommands) -> FinanceResult<()> {
    let service = BudgetGoalService::new(storage);
    let options = DisplayOptions::from_settings(settings);

    match cmd {
        GoalCommands::Add {
            category,
            limit,
            period,
        } => {
            let goal = service.create(&category, parse_amount(&limit)?, period)?;
            println!(
                "Created {} goal '{}' with a limit of {}",
                goal.period.to_string().to_lowercase(),
                goal.category,
                options.money(goal.limit)
            );
            let untracked = goal.category != MONTHLY_EXPENSES_GOAL
                && !goal.category.ends_with(GOAL_SUFFIX);
            if untracked && settings.goal_matching == GoalMatching::Convention {
                println!(
                    "  Note: expenses only count toward goals named \"<Category>{}\" or \"{}\".",
                    GOAL_SUFFIX, MONTHLY_EXPENSES_GOAL
                );
            }
        }

        GoalCommands::List => {
            let goals = service.progress()?;
            print!("{}", format_goal_table(&goals, &options));
        }

        GoalCommands::Edit {
            goal,
            category,
            limit,
            period,
        } => {
            if category.is_none() && limit.is_none() && period.is_none() {
                println!("No changes specified. Use --category, --limit, or --period.");
                return Ok(());
            }

            let limit = limit.as_deref().map(parse_amount).transpose()?;
            let updated = service.update(
                &goal,
                GoalUpdate {
                    category,
                    limit,
                    period,
                },
            )?;
            println!("Updated goal: {}", updated.category);
        }

        GoalCommands::Delete { goal } => {
            let deleted = service.delete(&goal)?;
            println!("Deleted goal: {}", deleted.category);
        }

        GoalCommands::Reset { goal } => {
            let reset = service.reset(&goal)?;
            println!("Reset spending for goal: {}", reset.category);
        }
    }

    Ok(())
}
