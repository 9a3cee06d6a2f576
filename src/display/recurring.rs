//! Recurring transaction display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{short_id, DisplayOptions};
use crate::models::{RecurringTransaction, TransactionType};
use crate::services::{DueProcessingReport, UpcomingOccurrence};

#[derive(Tabled)]
struct RecurringRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Every")]
    frequency: String,
    #[tabled(rename = "Next")]
    next: String,
    #[tabled(rename = "Ends")]
    ends: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct UpcomingRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Format recurring definitions as a table
pub fn format_recurring_table(items: &[RecurringTransaction], options: &DisplayOptions) -> String {
    if items.is_empty() {
        return "No recurring transactions found.\n".to_string();
    }

    let rows = items.iter().map(|r| {
        let signed = match r.kind {
            TransactionType::Income => r.amount,
            TransactionType::Expense => -r.amount,
        };
        RecurringRow {
            id: short_id(&r.id),
            name: r.name.clone(),
            category: r.category.clone(),
            amount: options.money(signed),
            frequency: r.frequency.label().to_string(),
            next: options.date(r.next_date),
            ends: r.end_date.map(|d| options.date(d)).unwrap_or_else(|| "-".to_string()),
            status: if r.active { "active" } else { "paused" }.to_string(),
        }
    });
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

/// Format projected occurrences; overdue ones are flagged
pub fn format_upcoming_table(items: &[UpcomingOccurrence], options: &DisplayOptions) -> String {
    if items.is_empty() {
        return "Nothing scheduled.\n".to_string();
    }

    let rows = items.iter().map(|o| UpcomingRow {
        date: if o.overdue {
            format!("{} (overdue)", options.date(o.date))
        } else {
            options.date(o.date)
        },
        name: o.name.clone(),
        category: o.category.clone(),
        amount: options.money(o.amount),
    });
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

/// Summary of a due-processing run
pub fn format_due_report(report: &DueProcessingReport, options: &DisplayOptions) -> String {
    if report.is_empty() {
        return "No recurring transactions due.\n".to_string();
    }

    let mut output = String::new();
    if !report.created.is_empty() {
        output.push_str(&format!(
            "Created {} transaction(s) from recurring items:\n",
            report.created.len()
        ));
        for txn in &report.created {
            output.push_str(&format!(
                "  {}  {:<16} {:>12}\n",
                options.date(txn.date),
                txn.category,
                options.money(txn.signed_amount())
            ));
        }
    }
    for name in &report.capped {
        output.push_str(&format!(
            "'{}' still has occurrences due; run again to continue catching up\n",
            name
        ));
    }
    for (name, reason) in &report.failed {
        output.push_str(&format!("'{}' failed: {}\n", name, reason));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, Money, RecurringId};
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_recurring_table() {
        let mut rent = RecurringTransaction::new(
            "Rent",
            TransactionType::Expense,
            Money::from_cents(150_000),
            "Housing",
            Frequency::Monthly,
            ymd(2025, 1, 1),
        );
        rent.toggle();

        let output = format_recurring_table(&[rent], &DisplayOptions::default());
        assert!(output.contains("Rent"));
        assert!(output.contains("-$1,500.00"));
        assert!(output.contains("paused"));
    }

    #[test]
    fn test_upcoming_marks_overdue() {
        let item = UpcomingOccurrence {
            recurring_id: RecurringId::new(),
            name: "Gym".into(),
            kind: TransactionType::Expense,
            amount: Money::from_cents(4_000),
            category: "Health".into(),
            date: ymd(2025, 3, 1),
            overdue: true,
        };
        let output = format_upcoming_table(&[item], &DisplayOptions::default());
        assert!(output.contains("2025-03-01 (overdue)"));
    }

    #[test]
    fn test_empty_due_report() {
        let output = format_due_report(&DueProcessingReport::default(), &DisplayOptions::default());
        assert_eq!(output, "No recurring transactions due.\n");
    }
}
