//! Import service
//!
//! Loads data back from a full JSON or YAML export, or transactions from a
//! CSV export. Document imports check each record on its own: bad records are
//! dropped with a reason and the rest of the collection is still imported.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::io::Read;

use chrono::NaiveDate;
use csv::StringRecord;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{FinanceError, FinanceResult};
use crate::models::{
    BudgetGoal, Category, GoalMatching, Money, RecurringTransaction, Transaction, TransactionType,
};
use crate::services::{CreateTransactionInput, TransactionService};
use crate::storage::{keys, Storage};

/// A record left out of an import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub collection: &'static str,
    /// Position in the source array or CSV row (0-indexed, excluding header);
    /// `None` when the whole collection was unusable
    pub index: Option<usize>,
    pub reason: String,
}

/// Outcome of a document import
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// False when the document could not be read at all
    pub success: bool,
    /// Set when `success` is false
    pub error: Option<String>,
    /// Collections that were replaced, with how many records they now hold
    pub imported: Vec<(&'static str, usize)>,
    pub rejections: Vec<Rejection>,
}

impl ImportReport {
    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Number of records accepted for a collection, if it was present
    pub fn imported_count(&self, collection: &str) -> Option<usize> {
        self.imported
            .iter()
            .find(|(key, _)| *key == collection)
            .map(|(_, count)| *count)
    }

    pub fn total_imported(&self) -> usize {
        self.imported.iter().map(|(_, count)| count).sum()
    }
}

/// Outcome of a CSV transaction import
#[derive(Debug, Clone, Default)]
pub struct CsvImportResult {
    pub imported: usize,
    pub duplicates_skipped: usize,
    pub rejections: Vec<Rejection>,
}

/// Typed checks applied to each record of an imported collection
trait ImportRecord: DeserializeOwned {
    /// Full id, so records sharing a short display prefix stay distinct
    fn record_id(&self) -> Uuid;
    fn check(&self) -> Result<(), String>;
}

impl ImportRecord for Transaction {
    fn record_id(&self) -> Uuid {
        *self.id.as_uuid()
    }
    fn check(&self) -> Result<(), String> {
        self.validate().map_err(|e| e.to_string())
    }
}

impl ImportRecord for Category {
    fn record_id(&self) -> Uuid {
        *self.id.as_uuid()
    }
    fn check(&self) -> Result<(), String> {
        self.validate().map_err(|e| e.to_string())
    }
}

impl ImportRecord for BudgetGoal {
    fn record_id(&self) -> Uuid {
        *self.id.as_uuid()
    }
    fn check(&self) -> Result<(), String> {
        self.validate().map_err(|e| e.to_string())
    }
}

impl ImportRecord for RecurringTransaction {
    fn record_id(&self) -> Uuid {
        *self.id.as_uuid()
    }
    fn check(&self) -> Result<(), String> {
        self.validate().map_err(|e| e.to_string())
    }
}

/// Service for importing data
pub struct ImportService<'a> {
    storage: &'a Storage,
    matching: GoalMatching,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            matching: GoalMatching::default(),
        }
    }

    /// Goal matching used for transactions added by CSV import
    pub fn with_goal_matching(mut self, matching: GoalMatching) -> Self {
        self.matching = matching;
        self
    }

    /// Import a JSON document. Never fails; problems are in the report.
    pub fn import_json(&self, json: &str) -> ImportReport {
        match serde_json::from_str::<Value>(json) {
            Ok(document) => self.import_document(&document),
            Err(e) => {
                warn!(error = %e, "Import failed: invalid JSON");
                ImportReport::failed(format!("Invalid JSON: {}", e))
            }
        }
    }

    /// Import a YAML document with the same shape as the JSON export
    pub fn import_yaml(&self, yaml: &str) -> ImportReport {
        match serde_yaml::from_str::<Value>(yaml) {
            Ok(document) => self.import_document(&document),
            Err(e) => {
                warn!(error = %e, "Import failed: invalid YAML");
                ImportReport::failed(format!("Invalid YAML: {}", e))
            }
        }
    }

    /// Replace every collection present in the document with its valid records.
    /// Collections missing from the document are left untouched.
    pub fn import_document(&self, document: &Value) -> ImportReport {
        let Some(object) = document.as_object() else {
            warn!("Import failed: document is not an object");
            return ImportReport::failed("Import document must be an object");
        };

        let mut report = ImportReport {
            success: true,
            ..Default::default()
        };

        if let Some(records) = parse_collection::<Transaction>(keys::TRANSACTIONS, object, &mut report) {
            self.store(keys::TRANSACTIONS, records, |r| self.storage.transactions.replace_all(r), &mut report);
        }
        if let Some(records) = parse_collection::<Category>(keys::CATEGORIES, object, &mut report) {
            self.store(keys::CATEGORIES, records, |r| self.storage.categories.replace_all(r), &mut report);
        }
        if let Some(records) = parse_collection::<BudgetGoal>(keys::BUDGET_GOALS, object, &mut report) {
            self.store(keys::BUDGET_GOALS, records, |r| self.storage.budget_goals.replace_all(r), &mut report);
        }
        if let Some(records) =
            parse_collection::<RecurringTransaction>(keys::RECURRING_TRANSACTIONS, object, &mut report)
        {
            self.store(
                keys::RECURRING_TRANSACTIONS,
                records,
                |r| self.storage.recurring.replace_all(r),
                &mut report,
            );
        }

        info!(
            imported = report.total_imported(),
            rejected = report.rejections.len(),
            "Imported data"
        );
        if !report.rejections.is_empty() {
            warn!(count = report.rejections.len(), "Some imported records were rejected");
        }

        report
    }

    fn store<T>(
        &self,
        key: &'static str,
        records: Vec<T>,
        replace: impl FnOnce(Vec<T>) -> FinanceResult<()>,
        report: &mut ImportReport,
    ) {
        let count = records.len();
        match replace(records) {
            Ok(()) => {
                self.storage.persist(key);
                report.imported.push((key, count));
            }
            Err(e) => {
                warn!(collection = key, error = %e, "Could not replace collection");
                report.rejections.push(Rejection {
                    collection: key,
                    index: None,
                    reason: e.to_string(),
                });
            }
        }
    }

    /// Import transactions from a CSV file in the basic or detailed export
    /// layout. Rows matching an existing transaction are skipped.
    pub fn import_csv<R: Read>(&self, reader: R) -> FinanceResult<CsvImportResult> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| FinanceError::Import(e.to_string()))?
            .clone();
        let columns = CsvColumns::from_headers(&headers)?;

        let mut seen: HashSet<u64> = self
            .storage
            .transactions
            .get_all()?
            .iter()
            .map(|t| row_fingerprint(t.kind, t.amount, &t.category, t.date, t.note.as_deref()))
            .collect();

        let service = TransactionService::new(self.storage).with_goal_matching(self.matching);
        let mut result = CsvImportResult::default();

        for (index, record) in csv_reader.records().enumerate() {
            let parsed = record
                .map_err(|e| format!("Error reading CSV record: {}", e))
                .and_then(|record| columns.parse(&record));

            let input = match parsed {
                Ok(input) => input,
                Err(reason) => {
                    result.rejections.push(Rejection {
                        collection: keys::TRANSACTIONS,
                        index: Some(index),
                        reason,
                    });
                    continue;
                }
            };

            let fingerprint = row_fingerprint(
                input.kind,
                input.amount,
                input.category.trim(),
                input.date,
                input.note.as_deref(),
            );
            if !seen.insert(fingerprint) {
                result.duplicates_skipped += 1;
                continue;
            }

            match service.add(input) {
                Ok(_) => result.imported += 1,
                Err(e) => result.rejections.push(Rejection {
                    collection: keys::TRANSACTIONS,
                    index: Some(index),
                    reason: e.to_string(),
                }),
            }
        }

        info!(
            imported = result.imported,
            duplicates = result.duplicates_skipped,
            rejected = result.rejections.len(),
            "Imported transactions from CSV"
        );
        Ok(result)
    }
}

/// Deserialize and validate one collection of the document.
///
/// Returns `None` when the key is absent or not an array.
fn parse_collection<T: ImportRecord>(
    key: &'static str,
    object: &serde_json::Map<String, Value>,
    report: &mut ImportReport,
) -> Option<Vec<T>> {
    let value = object.get(key)?;
    let Some(items) = value.as_array() else {
        report.rejections.push(Rejection {
            collection: key,
            index: None,
            reason: "expected an array".to_string(),
        });
        return None;
    };

    let mut ids = HashSet::new();
    let mut records = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let checked = T::deserialize(item)
            .map_err(|e| e.to_string())
            .and_then(|record| record.check().map(|()| record))
            .and_then(|record| {
                if ids.insert(record.record_id()) {
                    Ok(record)
                } else {
                    Err(format!("duplicate id {}", record.record_id()))
                }
            });

        match checked {
            Ok(record) => records.push(record),
            Err(reason) => report.rejections.push(Rejection {
                collection: key,
                index: Some(index),
                reason,
            }),
        }
    }

    Some(records)
}

/// Identity of a transaction for duplicate detection in CSV imports
fn row_fingerprint(
    kind: TransactionType,
    amount: Money,
    category: &str,
    date: NaiveDate,
    note: Option<&str>,
) -> u64 {
    let mut hasher = DefaultHasher::new();
    kind.hash(&mut hasher);
    amount.hash(&mut hasher);
    category.hash(&mut hasher);
    date.hash(&mut hasher);
    note.filter(|n| !n.trim().is_empty()).hash(&mut hasher);
    hasher.finish()
}

/// Column positions found in a CSV header
#[derive(Debug, Clone, Copy)]
struct CsvColumns {
    kind: usize,
    category: usize,
    amount: usize,
    date: usize,
    note: Option<usize>,
    emoji: Option<usize>,
}

impl CsvColumns {
    fn from_headers(headers: &StringRecord) -> FinanceResult<Self> {
        let position = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let required = |name: &str| {
            position(name).ok_or_else(|| {
                FinanceError::Import(format!("CSV is missing the '{}' column", name))
            })
        };

        Ok(Self {
            kind: required("Type")?,
            category: required("Category")?,
            amount: required("Amount")?,
            date: required("Date")?,
            note: position("Note"),
            emoji: position("Emoji"),
        })
    }

    fn parse(&self, record: &StringRecord) -> Result<CreateTransactionInput, String> {
        let field = |index: usize| record.get(index).unwrap_or("");

        let kind: TransactionType = field(self.kind).parse()?;
        let amount = Money::parse(field(self.amount)).map_err(|e| e.to_string())?;
        let date = NaiveDate::parse_from_str(field(self.date), "%Y-%m-%d")
            .map_err(|_| format!("Could not parse date: '{}'", field(self.date)))?;

        let mut input = CreateTransactionInput::new(kind, amount, field(self.category), date);
        if let Some(note) = self.note.map(field).filter(|n| !n.is_empty()) {
            input = input.note(note);
        }
        if let Some(emoji) = self.emoji.map(field).filter(|e| !e.is_empty()) {
            input = input.emoji(emoji);
        }
        Ok(input)
    }
}
