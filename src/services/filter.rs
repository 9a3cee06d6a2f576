//! Transaction filtering
//!
//! A filter selects transactions by category and by a date window. Windows
//! are either named presets relative to "today" or a custom inclusive range.

use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate};
use tracing::debug;

use crate::models::{Transaction, TransactionType};

/// Category selector meaning "no category filter"
pub const ALL_CATEGORIES: &str = "All Categories";

/// Range selector for an explicit start and end date
pub const CUSTOM_RANGE: &str = "Custom range";

/// Named date windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRangePreset {
    #[default]
    Last30Days,
    ThisMonth,
    LastMonth,
    Last3Months,
    ThisYear,
    AllTime,
    Custom,
}

impl DateRangePreset {
    pub const ALL: [DateRangePreset; 7] = [
        Self::Last30Days,
        Self::ThisMonth,
        Self::LastMonth,
        Self::Last3Months,
        Self::ThisYear,
        Self::AllTime,
        Self::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Last30Days => "last30Days",
            Self::ThisMonth => "thisMonth",
            Self::LastMonth => "lastMonth",
            Self::Last3Months => "last3Months",
            Self::ThisYear => "thisYear",
            Self::AllTime => "allTime",
            Self::Custom => CUSTOM_RANGE,
        }
    }

    /// Parse a preset name. Unrecognized names fall back to `Last30Days`.
    pub fn parse_lenient(value: &str) -> Self {
        let normalized: String = value
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "last30days" => Self::Last30Days,
            "thismonth" => Self::ThisMonth,
            "lastmonth" => Self::LastMonth,
            "last3months" => Self::Last3Months,
            "thisyear" => Self::ThisYear,
            "alltime" | "all" => Self::AllTime,
            "customrange" | "custom" => Self::Custom,
            _ => {
                debug!(preset = value, "Unknown date range, using last 30 days");
                Self::Last30Days
            }
        }
    }

    /// Inclusive bounds for this window. `None` means unbounded.
    pub fn bounds(
        &self,
        today: NaiveDate,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> DateBounds {
        match self {
            Self::Last30Days => DateBounds::from(today.checked_sub_days(Days::new(30))),
            Self::ThisMonth => DateBounds::from(first_of_month(today)),
            Self::LastMonth => {
                let first_this = first_of_month(today);
                let first_last = first_this.and_then(|d| d.checked_sub_months(Months::new(1)));
                let last_last = first_this.and_then(|d| d.pred_opt());
                DateBounds {
                    start: first_last,
                    end: last_last,
                }
            }
            Self::Last3Months => DateBounds::from(today.checked_sub_months(Months::new(3))),
            Self::ThisYear => DateBounds::from(NaiveDate::from_ymd_opt(today.year(), 1, 1)),
            Self::AllTime => DateBounds::default(),
            Self::Custom => match (start, end) {
                (Some(start), Some(end)) => DateBounds {
                    start: Some(start),
                    end: Some(end),
                },
                // An incomplete custom range does not filter by date
                _ => DateBounds::default(),
            },
        }
    }
}

impl fmt::Display for DateRangePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn first_of_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)
}

/// Inclusive date bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateBounds {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateBounds {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

impl From<Option<NaiveDate>> for DateBounds {
    fn from(start: Option<NaiveDate>) -> Self {
        Self { start, end: None }
    }
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Category name; `None` matches every category
    pub category: Option<String>,
    pub range: DateRangePreset,
    /// Used by `DateRangePreset::Custom`
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub kind: Option<TransactionType>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    /// Create a new filter (last 30 days, every category)
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter that matches everything
    pub fn all_time() -> Self {
        Self::new().range(DateRangePreset::AllTime)
    }

    /// Build from the selector strings the front end offers
    pub fn from_selection(
        category: &str,
        range: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Self {
        let mut filter = Self::new()
            .category(category)
            .range(DateRangePreset::parse_lenient(range));
        filter.start_date = start_date;
        filter.end_date = end_date;
        filter
    }

    /// Filter by category name. `"All Categories"` or blank clears it.
    pub fn category(mut self, category: &str) -> Self {
        let category = category.trim();
        self.category = if category.is_empty() || category == ALL_CATEGORIES {
            None
        } else {
            Some(category.to_string())
        };
        self
    }

    pub fn range(mut self, range: DateRangePreset) -> Self {
        self.range = range;
        self
    }

    /// Custom inclusive date range
    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.range = DateRangePreset::Custom;
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn bounds(&self, today: NaiveDate) -> DateBounds {
        self.range.bounds(today, self.start_date, self.end_date)
    }

    pub fn matches(&self, transaction: &Transaction, bounds: &DateBounds) -> bool {
        self.category
            .as_deref()
            .map_or(true, |category| transaction.category == category)
            && self.kind.map_or(true, |kind| transaction.kind == kind)
            && bounds.contains(transaction.date)
    }

    /// Select matching transactions, keeping their input order
    pub fn apply(&self, transactions: &[Transaction], today: NaiveDate) -> Vec<Transaction> {
        let bounds = self.bounds(today);
        let matching = transactions
            .iter()
            .filter(|t| self.matches(t, &bounds))
            .cloned();

        match self.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }
}
