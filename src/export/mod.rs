//! Export module for fintrack
//!
//! Provides data export in multiple formats:
//! - CSV: transactions only (spreadsheet-compatible)
//! - JSON: every collection as one document, importable again
//! - YAML: the same document in human-readable form

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_transactions_csv, write_transactions_csv, CsvLayout, BASIC_HEADER, DETAILED_HEADER};
pub use json::{export_full_json, export_full_json_string, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;
