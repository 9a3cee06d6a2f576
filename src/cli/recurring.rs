//! Recurring transaction CLI commands

use clap::Subcommand;

use super::{parse_amount, parse_date, parse_optional_date};
use crate::clock::Clock;
use crate::config::Settings;
use crate::display::{
    format_due_report, format_recurring_table, format_upcoming_table, DisplayOptions,
};
use crate::error::FinanceResult;
use crate::models::{Frequency, TransactionType};
use crate::services::{CreateRecurringInput, RecurringService, RecurringUpdate};
use crate::storage::Storage;

/// Recurring transaction subcommands
#[derive(Subcommand)]
pub enum RecurringCommands {
    /// Define a recurring income or expense
    Add {
        /// Name, e.g. "Rent"
        name: String,
        /// income or expense
        kind: TransactionType,
        /// Amount per occurrence
        amount: String,
        /// Category name
        category: String,
        /// daily, weekly, biweekly, monthly, quarterly or yearly
        #[arg(short, long, default_value = "monthly")]
        frequency: Frequency,
        /// First occurrence (YYYY-MM-DD, default today)
        #[arg(short, long)]
        start: Option<String>,
        /// Last possible occurrence (YYYY-MM-DD)
        #[arg(short, long)]
        end: Option<String>,
        /// Note added to each generated transaction
        #[arg(short, long)]
        note: Option<String>,
    },

    /// List recurring transactions
    List,

    /// Edit a recurring transaction
    Edit {
        /// Name or ID
        recurring: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        frequency: Option<Frequency>,
        /// Move the next occurrence (YYYY-MM-DD)
        #[arg(long)]
        next: Option<String>,
        /// New end date (YYYY-MM-DD)
        #[arg(short, long, conflicts_with = "no_end")]
        end: Option<String>,
        /// Remove the end date
        #[arg(long)]
        no_end: bool,
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Record one occurrence now, dated today
    Process {
        /// Name or ID
        recurring: String,
    },

    /// Pause or resume a recurring transaction
    Toggle {
        /// Name or ID
        recurring: String,
    },

    /// Delete a recurring transaction
    Delete {
        /// Name or ID
        recurring: String,
    },

    /// Record every occurrence that has come due
    Due {
        /// Only list what is due without recording anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Show upcoming occurrences
    Upcoming {
        /// How many days ahead to look
        #[arg(short, long, default_value = "30")]
        days: u64,
    },
}

/// Handle a recurring command
pub fn handle_recurring_command(
    storage: &Storage,
    settings: &Settings,
    clock: &dyn Clock,
    cmd: RecurringCommands,
) -> FinanceResult<()> {
    let service = RecurringService::new(storage, clock).with_goal_matching(settings.goal_matching);
    let options = DisplayOptions::from_settings(settings);

    match cmd {
        RecurringCommands::Add {
            name,
            kind,
            amount,
            category,
            frequency,
            start,
            end,
            note,
        } => {
            let start_date = match start {
                Some(s) => parse_date(&s)?,
                None => clock.today(),
            };
            let recurring = service.create(CreateRecurringInput {
                name,
                kind,
                amount: parse_amount(&amount)?,
                category,
                frequency,
                start_date,
                end_date: parse_optional_date(end.as_deref())?,
                note,
            })?;

            println!(
                "Created recurring '{}': {} {} {}",
                recurring.name,
                recurring.frequency.label().to_lowercase(),
                recurring.kind.as_str(),
                options.money(recurring.amount)
            );
            println!("  Next: {}", options.date(recurring.next_date));
            println!("  ID: {}", recurring.id);
        }

        RecurringCommands::List => {
            let items = service.list()?;
            print!("{}", format_recurring_table(&items, &options));
        }

        RecurringCommands::Edit {
            recurring,
            name,
            amount,
            category,
            frequency,
            next,
            end,
            no_end,
            note,
        } => {
            let end_date = if no_end {
                Some(None)
            } else {
                parse_optional_date(end.as_deref())?.map(Some)
            };
            let update = RecurringUpdate {
                name,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                category,
                frequency,
                next_date: parse_optional_date(next.as_deref())?,
                end_date,
                note,
            };

            let updated = service.update(&recurring, update)?;
            println!("Updated recurring: {}", updated.name);
        }

        RecurringCommands::Process { recurring } => match service.process(&recurring)? {
            Some(txn) => println!(
                "Recorded {} of {} in {} on {}",
                txn.kind.as_str(),
                options.money(txn.amount),
                txn.category,
                options.date(txn.date)
            ),
            None => println!("Nothing recorded: '{}' is paused or does not exist.", recurring),
        },

        RecurringCommands::Toggle { recurring } => {
            let toggled = service.toggle(&recurring)?;
            let state = if toggled.active { "Resumed" } else { "Paused" };
            println!("{} recurring: {}", state, toggled.name);
        }

        RecurringCommands::Delete { recurring } => {
            let deleted = service.delete(&recurring)?;
            println!("Deleted recurring: {}", deleted.name);
        }

        RecurringCommands::Due { dry_run } => {
            let today = clock.today();
            if dry_run {
                let due = service.due(today)?;
                print!("{}", format_recurring_table(&due, &options));
            } else {
                let report = service.process_due(today)?;
                print!("{}", format_due_report(&report, &options));
            }
        }

        RecurringCommands::Upcoming { days } => {
            let upcoming = service.upcoming(clock.today(), days)?;
            print!("{}", format_upcoming_table(&upcoming, &options));
        }
    }

    Ok(())
}
