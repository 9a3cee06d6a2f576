//! YAML Export functionality
//!
//! Same document as the JSON export, for people who prefer reading YAML.

use std::io::Write;

use crate::error::{FinanceError, FinanceResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

/// Export everything to YAML format
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> FinanceResult<()> {
    let export = FullExport::from_storage(storage)?;

    writeln!(writer, "# fintrack data export")
        .map_err(|e| FinanceError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| FinanceError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| FinanceError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| FinanceError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, CategoryType};

    #[test]
    fn test_yaml_export() {
        let storage = Storage::in_memory();
        storage
            .categories
            .insert(Category::new("Salary", "💼", CategoryType::Income))
            .unwrap();

        let mut output = Vec::new();
        export_full_yaml(&storage, &mut output).unwrap();
        let yaml = String::from_utf8(output).unwrap();

        assert!(yaml.starts_with("# fintrack data export"));
        assert!(yaml.contains("budgetGoals: []"));
        assert!(yaml.contains("name: Salary"));

        let parsed: FullExport = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.categories.len(), 1);
    }
}
