//! Service layer for fintrack
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, derived figures, and cross-entity operations such as
//! keeping budget goals in step with expenses.

pub mod budget_goal;
pub mod category;
pub mod filter;
pub mod import;
pub mod recurring;
pub mod summary;
pub mod transaction;

pub use budget_goal::{BudgetGoalService, GoalUpdate};
pub use category::{CategoryService, CategoryUpdate};
pub use filter::{DateBounds, DateRangePreset, TransactionFilter, ALL_CATEGORIES, CUSTOM_RANGE};
pub use import::{CsvImportResult, ImportReport, ImportService, Rejection};
pub use recurring::{
    CreateRecurringInput, DueProcessingReport, RecurringService, RecurringUpdate,
    UpcomingOccurrence,
};
pub use summary::SummaryService;
pub use transaction::{CreateTransactionInput, TransactionService};
