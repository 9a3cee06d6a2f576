//! CLI command for importing data

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};

use crate::config::Settings;
use crate::error::{FinanceError, FinanceResult};
use crate::services::{ImportService, Rejection};
use crate::storage::Storage;

/// Import file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImportFormat {
    /// Full JSON export
    Json,
    /// Full YAML export
    Yaml,
    /// Transactions in the CSV export layout
    Csv,
}

impl ImportFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Arguments for `fintrack import`
#[derive(Args)]
pub struct ImportArgs {
    /// File to import
    pub file: PathBuf,
    /// File format (default: from the file extension)
    #[arg(short, long, value_enum)]
    pub format: Option<ImportFormat>,
}

fn print_rejections(rejections: &[Rejection]) {
    if rejections.is_empty() {
        return;
    }
    println!("Rejected {} record(s):", rejections.len());
    for rejection in rejections {
        match rejection.index {
            Some(index) => println!("  {}[{}]: {}", rejection.collection, index, rejection.reason),
            None => println!("  {}: {}", rejection.collection, rejection.reason),
        }
    }
}

/// Handle the import command
pub fn handle_import_command(storage: &Storage, settings: &Settings, args: ImportArgs) -> FinanceResult<()> {
    let format = args
        .format
        .or_else(|| ImportFormat::from_path(&args.file))
        .ok_or_else(|| {
            FinanceError::Import(format!(
                "Cannot tell the format of {}. Use --format json, yaml or csv",
                args.file.display()
            ))
        })?;

    let contents = std::fs::read_to_string(&args.file).map_err(|e| {
        FinanceError::Import(format!("Failed to read {}: {}", args.file.display(), e))
    })?;
    let service = ImportService::new(storage).with_goal_matching(settings.goal_matching);

    if format == ImportFormat::Csv {
        let result = service.import_csv(contents.as_bytes())?;
        println!("Imported {} transaction(s)", result.imported);
        if result.duplicates_skipped > 0 {
            println!("Skipped {} duplicate(s)", result.duplicates_skipped);
        }
        print_rejections(&result.rejections);
        return Ok(());
    }

    let report = match format {
        ImportFormat::Yaml => service.import_yaml(&contents),
        _ => service.import_json(&contents),
    };

    if !report.success {
        return Err(FinanceError::Import(
            report.error.unwrap_or_else(|| "Import failed".to_string()),
        ));
    }

    if report.imported.is_empty() {
        println!("Nothing imported: the file has no known collections.");
    }
    for (collection, count) in &report.imported {
        println!("Imported {} {}", count, collection);
    }
    print_rejections(&report.rejections);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(ImportFormat::from_path(Path::new("backup.JSON")), Some(ImportFormat::Json));
        assert_eq!(ImportFormat::from_path(Path::new("data.yml")), Some(ImportFormat::Yaml));
        assert_eq!(ImportFormat::from_path(Path::new("bank.csv")), Some(ImportFormat::Csv));
        assert_eq!(ImportFormat::from_path(Path::new("notes.txt")), None);
    }
}
