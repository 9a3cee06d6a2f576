//! CLI commands for data export

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Subcommand;

use crate::error::{FinanceError, FinanceResult};
use crate::export::{csv, json, yaml, CsvLayout};
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export everything as JSON (importable with `fintrack import`)
    Json {
        /// Output file path (default: standard output)
        output: Option<PathBuf>,
    },

    /// Export everything as YAML
    Yaml {
        /// Output file path (default: standard output)
        output: Option<PathBuf>,
    },

    /// Export transactions as CSV
    Csv {
        /// Output file path (default: standard output)
        output: Option<PathBuf>,
        /// Include ID, emoji and creation time columns
        #[arg(long)]
        detailed: bool,
    },
}

/// Open the output file, or standard output when no path is given
fn open_output(output: Option<&PathBuf>) -> FinanceResult<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                FinanceError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> FinanceResult<()> {
    let (output, what) = match cmd {
        ExportCommands::Json { output } => {
            let mut writer = open_output(output.as_ref())?;
            json::export_full_json(storage, &mut writer)?;
            writer.flush()?;
            (output, "Full data export")
        }
        ExportCommands::Yaml { output } => {
            let mut writer = open_output(output.as_ref())?;
            yaml::export_full_yaml(storage, &mut writer)?;
            writer.flush()?;
            (output, "Full data export")
        }
        ExportCommands::Csv { output, detailed } => {
            let layout = if detailed {
                CsvLayout::Detailed
            } else {
                CsvLayout::Basic
            };
            let mut writer = open_output(output.as_ref())?;
            csv::export_transactions_csv(storage, layout, &mut writer)?;
            writer.flush()?;
            (output, "Transactions")
        }
    };

    // Keep stdout clean when the export itself went there
    if let Some(path) = output {
        println!("{} written to: {}", what, path.display());
    }

    Ok(())
}
