//! Configuration CLI commands

use clap::Subcommand;

use crate::config::{FinancePaths, Settings};
use crate::error::FinanceResult;

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show paths and current settings
    Show,

    /// Change a setting
    #[command(after_help = "Keys: currency, currency.symbol, locale, date-format, theme, \
                            accent-color, goal-matching, auto-process-recurring, chunk-size")]
    Set {
        /// Setting name
        key: String,
        /// New value
        value: String,
    },
}

fn print_settings(paths: &FinancePaths, settings: &Settings) {
    println!("fintrack Configuration");
    println!("======================");
    println!("Base directory:  {}", paths.base_dir().display());
    println!("Data directory:  {}", paths.data_dir().display());
    println!("Settings file:   {}", paths.settings_file().display());
    println!();
    println!("Settings:");
    println!("  currency:               {} ({})", settings.currency.code, settings.currency.symbol.trim());
    println!("  locale:                 {}", settings.locale.language_tag);
    println!("  date-format:            {}", settings.date_format);
    println!("  theme:                  {:?}", settings.appearance.theme);
    println!("  accent-color:           {}", settings.appearance.accent_color);
    println!("  goal-matching:          {}", settings.goal_matching);
    println!("  auto-process-recurring: {}", settings.auto_process_recurring);
    println!("  chunk-size:             {}", settings.storage.chunk_size);
}

/// Handle a config command
pub fn handle_config_command(
    paths: &FinancePaths,
    settings: &mut Settings,
    cmd: Option<ConfigCommands>,
) -> FinanceResult<()> {
    match cmd.unwrap_or(ConfigCommands::Show) {
        ConfigCommands::Show => print_settings(paths, settings),
        ConfigCommands::Set { key, value } => {
            settings.set_value(&key, &value)?;
            settings.save(paths)?;
            println!("Set {} = {}", key, value);
        }
    }

    Ok(())
}
