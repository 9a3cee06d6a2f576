//! Report formatting utilities for terminal output

use super::DisplayOptions;
use crate::reports::{MonthlyTrend, SpendingReport, Totals};

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct < 0.1 && pct > 0.0 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return "░".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Income, expenses and balance block
pub fn format_totals(totals: &Totals, options: &DisplayOptions) -> String {
    let mut output = String::new();

    output.push_str(&format!("Income:   {:>14}\n", options.money(totals.income)));
    output.push_str(&format!("Expenses: {:>14}\n", options.money(totals.expenses)));
    output.push_str(&format!("Balance:  {:>14}\n", options.money(totals.balance)));
    if let Some(rate) = totals.savings_rate() {
        output.push_str(&format!("Saved:    {:>14}\n", format_percentage(rate)));
    }

    output
}

/// The dashboard shown by `fintrack summary`
pub fn format_summary(
    title: &str,
    totals: &Totals,
    spending: &SpendingReport,
    trend: &MonthlyTrend,
    options: &DisplayOptions,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Summary: {}\n", title));
    output.push_str(&"═".repeat(40));
    output.push('\n');
    output.push_str(&format_totals(totals, options));
    output.push('\n');
    output.push_str(&spending.format_terminal(&options.money));
    output.push('\n');
    output.push_str(&trend.format_terminal(&options.money));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.05), "0.05%");
        assert_eq!(format_percentage(5.26), "5.3%");
        assert_eq!(format_percentage(42.4), "42%");
    }

    #[test]
    fn test_format_bar() {
        assert_eq!(format_bar(50.0, 100.0, 4), "██░░");
        assert_eq!(format_bar(0.0, 100.0, 3), "░░░");
        assert_eq!(format_bar(500.0, 100.0, 2), "██");
    }

    #[test]
    fn test_format_totals() {
        let totals = Totals {
            income: Money::from_cents(100_000),
            expenses: Money::from_cents(25_000),
            balance: Money::from_cents(75_000),
        };
        let output = format_totals(&totals, &DisplayOptions::default());

        assert!(output.contains("$1,000.00"));
        assert!(output.contains("$750.00"));
        assert!(output.contains("75%"));
    }
}
