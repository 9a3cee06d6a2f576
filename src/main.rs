use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use fintrack::cli::{
    handle_category_command, handle_config_command, handle_export_command, handle_goal_command,
    handle_import_command, handle_recurring_command, handle_summary_command,
    handle_transaction_command, CategoryCommands, ConfigCommands, ExportCommands, GoalCommands,
    ImportArgs, RecurringCommands, SummaryArgs, TransactionCommands,
};
use fintrack::clock::{Clock, SystemClock};
use fintrack::config::{FinancePaths, Settings};
use fintrack::display::{format_due_report, DisplayOptions};
use fintrack::services::RecurringService;
use fintrack::storage::{initialize_storage, Storage};

/// Environment variable holding the log filter (falls back to `RUST_LOG`)
const LOG_ENV: &str = "FINTRACK_LOG";

#[derive(Parser)]
#[command(
    name = "fintrack",
    version,
    about = "Personal finance tracker",
    long_about = "fintrack records income and expenses, tracks spending against budget \
                  goals, runs recurring transactions and summarises where the money went."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory, default settings and default categories
    Init,

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Budget goal commands
    #[command(subcommand)]
    Goal(GoalCommands),

    /// Recurring transaction commands
    #[command(subcommand)]
    Recurring(RecurringCommands),

    /// Totals, spending by category and monthly trend
    Summary(SummaryArgs),

    /// Export data
    #[command(subcommand)]
    Export(ExportCommands),

    /// Import a JSON/YAML export or a CSV of transactions
    Import(ImportArgs),
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("fintrack=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Record recurring transactions that came due since the last run
fn process_due_recurring(storage: &Storage, settings: &Settings, clock: &dyn Clock) -> Result<()> {
    let report = RecurringService::new(storage, clock)
        .with_goal_matching(settings.goal_matching)
        .process_due(clock.today())?;

    if !report.is_empty() {
        info!(created = report.created.len(), "Processed due recurring transactions");
        eprint!(
            "{}",
            format_due_report(&report, &DisplayOptions::from_settings(settings))
        );
    }
    Ok(())
}

/// Open storage for a data command, setting up first-run state if needed
fn open_storage(paths: &FinancePaths, settings: &Settings, clock: &dyn Clock) -> Result<Storage> {
    let storage = initialize_storage(paths)?;
    if settings.auto_process_recurring {
        process_due_recurring(&storage, settings, clock)?;
    }
    Ok(storage)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let paths = FinancePaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    let clock = SystemClock;

    match cli.command {
        None => {
            println!("fintrack - personal finance tracker");
            println!();
            println!("Run 'fintrack --help' for usage information.");
        }
        Some(Commands::Init) => {
            let already = paths.is_initialized();
            let storage = initialize_storage(&paths)?;
            if already {
                println!("fintrack is already initialized at: {}", paths.base_dir().display());
            } else {
                println!("Initialized fintrack at: {}", paths.base_dir().display());
            }
            println!("Categories: {}", storage.categories.count()?);
            println!();
            println!("Run 'fintrack category list' to see all categories.");
        }
        Some(Commands::Config { command }) => {
            handle_config_command(&paths, &mut settings, command)?;
        }
        Some(Commands::Transaction(cmd)) => {
            let storage = open_storage(&paths, &settings, &clock)?;
            handle_transaction_command(&storage, &settings, &clock, cmd)?;
        }
        Some(Commands::Category(cmd)) => {
            let storage = open_storage(&paths, &settings, &clock)?;
            handle_category_command(&storage, cmd)?;
        }
        Some(Commands::Goal(cmd)) => {
            let storage = open_storage(&paths, &settings, &clock)?;
            handle_goal_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Recurring(cmd)) => {
            let storage = open_storage(&paths, &settings, &clock)?;
            handle_recurring_command(&storage, &settings, &clock, cmd)?;
        }
        Some(Commands::Summary(args)) => {
            let storage = open_storage(&paths, &settings, &clock)?;
            handle_summary_command(&storage, &settings, &clock, args)?;
        }
        Some(Commands::Export(cmd)) => {
            let storage = open_storage(&paths, &settings, &clock)?;
            handle_export_command(&storage, cmd)?;
        }
        Some(Commands::Import(args)) => {
            let storage = open_storage(&paths, &settings, &clock)?;
            handle_import_command(&storage, &settings, args)?;
        }
    }

    Ok(())
}
