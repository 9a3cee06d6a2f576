//! Reports module for fintrack
//!
//! Aggregations over transactions and goals: totals, spending by category,
//! monthly trend and budget goal progress.

pub mod goals;
pub mod spending;
pub mod totals;
pub mod trend;

pub use goals::{GoalReport, GoalReportRow};
pub use spending::{SpendingByCategory, SpendingReport};
pub use totals::Totals;
pub use trend::{MonthSummary, MonthlyTrend};
