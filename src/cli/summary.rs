//! Summary command: totals, spending by category and monthly trend

use clap::Args;

use super::transaction::build_filter;
use crate::clock::Clock;
use crate::config::Settings;
use crate::display::{format_summary, DisplayOptions};
use crate::error::{FinanceError, FinanceResult};
use crate::services::{SummaryService, ALL_CATEGORIES};
use crate::storage::Storage;

/// Arguments for `fintrack summary`
#[derive(Args)]
pub struct SummaryArgs {
    /// Date range: last30Days, thisMonth, lastMonth, last3Months, thisYear, allTime
    #[arg(short, long, default_value = "thisMonth")]
    pub range: String,
    /// Only this category
    #[arg(short, long, default_value = ALL_CATEGORIES)]
    pub category: String,
    /// Start of a custom range (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,
    /// End of a custom range (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
    /// Number of months in the trend table
    #[arg(short, long, default_value = "6")]
    pub months: usize,
    /// Write the category breakdown as CSV to this file
    #[arg(long)]
    pub csv: Option<std::path::PathBuf>,
}

/// Handle the summary command
pub fn handle_summary_command(
    storage: &Storage,
    settings: &Settings,
    clock: &dyn Clock,
    args: SummaryArgs,
) -> FinanceResult<()> {
    let service = SummaryService::new(storage);
    let options = DisplayOptions::from_settings(settings);
    let today = clock.today();

    let filter = build_filter(&args.category, &args.range, args.from.as_deref(), args.to.as_deref())?;
    let totals = service.totals_for(&filter, today)?;
    let spending = service.spending(&filter, today)?;
    let trend = service.trend(&filter, today)?.last(args.months);

    let title = match (filter.category.as_deref(), filter.range.as_str()) {
        (Some(category), range) => format!("{} ({})", range, category),
        (None, range) => range.to_string(),
    };
    print!("{}", format_summary(&title, &totals, &spending, &trend, &options));

    if let Some(path) = args.csv {
        let file = std::fs::File::create(&path).map_err(|e| {
            FinanceError::Export(format!("Failed to create file {}: {}", path.display(), e))
        })?;
        spending.export_csv(file)?;
        println!("Category breakdown written to: {}", path.display());
    }

    Ok(())
}
