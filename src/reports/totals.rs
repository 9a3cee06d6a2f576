//! Income, expense and balance totals
//!
//! Totals are always derived from the transactions passed in and never stored.

use crate::models::{Money, Transaction, TransactionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub income: Money,
    pub expenses: Money,
    /// Income minus expenses
    pub balance: Money,
}

impl Totals {
    pub fn from_transactions<'t>(transactions: impl IntoIterator<Item = &'t Transaction>) -> Self {
        let mut totals = Self::default();
        for txn in transactions {
            match txn.kind {
                TransactionType::Income => totals.income += txn.amount,
                TransactionType::Expense => totals.expenses += txn.amount,
            }
        }
        totals.balance = totals.income - totals.expenses;
        totals
    }

    /// Share of income left after expenses, as a percentage
    pub fn savings_rate(&self) -> Option<f64> {
        if self.income.is_positive() {
            Some(self.balance.as_f64() / self.income.as_f64() * 100.0)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_totals() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let transactions = vec![
            Transaction::new(TransactionType::Income, Money::from_cents(300_000), "Salary", date),
            Transaction::new(TransactionType::Expense, Money::from_cents(45_000), "Food", date),
            Transaction::new(TransactionType::Expense, Money::from_cents(5_000), "Transport", date),
        ];

        let totals = Totals::from_transactions(&transactions);
        assert_eq!(totals.income, Money::from_cents(300_000));
        assert_eq!(totals.expenses, Money::from_cents(50_000));
        assert_eq!(totals.balance, Money::from_cents(250_000));
    }

    #[test]
    fn test_balance_can_go_negative() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let transactions = vec![Transaction::new(
            TransactionType::Expense,
            Money::from_cents(1_000),
            "Food",
            date,
        )];

        let totals = Totals::from_transactions(&transactions);
        assert_eq!(totals.balance, Money::from_cents(-1_000));
        assert_eq!(totals.savings_rate(), None);
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let huge = Money::from_cents(i64::MAX);
        let transactions = vec![
            Transaction::new(TransactionType::Income, huge, "Salary", date),
            Transaction::new(TransactionType::Income, huge, "Salary", date),
        ];

        let totals = Totals::from_transactions(&transactions);
        assert_eq!(totals.income, huge);
        assert_eq!(totals.balance, huge);
    }
}
