//! Transaction service
//!
//! Adding and deleting transactions, keeping budget goal spending in step
//! with expense entries.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{FinanceError, FinanceResult};
use crate::models::{GoalMatching, Money, Transaction, TransactionType, DEFAULT_EMOJI};
use crate::storage::{keys, Storage};

use super::filter::TransactionFilter;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
    matching: GoalMatching,
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub kind: TransactionType,
    pub amount: Money,
    pub category: String,
    pub date: NaiveDate,
    /// Falls back to the category's emoji
    pub emoji: Option<String>,
    pub note: Option<String>,
}

impl CreateTransactionInput {
    pub fn new(
        kind: TransactionType,
        amount: Money,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            kind,
            amount,
            category: category.into(),
            date,
            emoji: None,
            note: None,
        }
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service using the default goal matching rule
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            matching: GoalMatching::default(),
        }
    }

    pub fn with_goal_matching(mut self, matching: GoalMatching) -> Self {
        self.matching = matching;
        self
    }

    /// Emoji for a new transaction: explicit, else the category's, else the default
    fn resolve_emoji(&self, requested: Option<String>, category: &str) -> FinanceResult<String> {
        if let Some(emoji) = requested.filter(|e| !e.trim().is_empty()) {
            return Ok(emoji);
        }
        let from_category = self
            .storage
            .categories
            .get_by_name(category)?
            .map(|c| c.emoji)
            .filter(|e| !e.is_empty());
        Ok(from_category.unwrap_or_else(|| DEFAULT_EMOJI.to_string()))
    }

    /// Record a new transaction.
    ///
    /// Expenses are added to every budget goal that tracks their category.
    pub fn add(&self, input: CreateTransactionInput) -> FinanceResult<Transaction> {
        let category = input.category.trim().to_string();
        let emoji = self.resolve_emoji(input.emoji, &category)?;

        let mut txn = Transaction::new(input.kind, input.amount, category, input.date)
            .with_emoji(emoji);
        if let Some(note) = input.note {
            txn = txn.with_note(note);
        }

        txn.validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;

        self.storage.transactions.prepend(txn.clone())?;
        self.storage.persist(keys::TRANSACTIONS);

        if txn.is_expense() {
            let touched = self.storage.budget_goals.apply_expense(
                &txn.category,
                txn.amount,
                self.matching,
            )?;
            if touched > 0 {
                debug!(goals = touched, category = %txn.category, "Updated budget goals");
                self.storage.persist(keys::BUDGET_GOALS);
            }
        }

        info!(id = %txn.id, kind = txn.kind.as_str(), amount = txn.amount.cents(), "Added transaction");
        Ok(txn)
    }

    /// Get a transaction by full or abbreviated ID
    pub fn get(&self, identifier: &str) -> FinanceResult<Transaction> {
        self.storage
            .transactions
            .find(identifier)?
            .ok_or_else(|| FinanceError::transaction_not_found(identifier))
    }

    /// Delete a transaction, rolling back any goal spending it contributed
    pub fn delete(&self, identifier: &str) -> FinanceResult<Transaction> {
        let txn = self.get(identifier)?;

        self.storage
            .transactions
            .remove(txn.id)?
            .ok_or_else(|| FinanceError::transaction_not_found(identifier))?;
        self.storage.persist(keys::TRANSACTIONS);

        if txn.is_expense() {
            let touched = self.storage.budget_goals.rollback_expense(
                &txn.category,
                txn.amount,
                self.matching,
            )?;
            if touched > 0 {
                self.storage.persist(keys::BUDGET_GOALS);
            }
        }

        info!(id = %txn.id, "Deleted transaction");
        Ok(txn)
    }

    /// All transactions, newest insertion first
    pub fn list_all(&self) -> FinanceResult<Vec<Transaction>> {
        self.storage.transactions.get_all()
    }

    /// Filtered transactions, newest date first
    pub fn list(&self, filter: &TransactionFilter, today: NaiveDate) -> FinanceResult<Vec<Transaction>> {
        let mut all = self.storage.transactions.get_all()?;
        // Stable sort keeps insertion order within a day
        all.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(filter.apply(&all, today))
    }

    pub fn count(&self) -> FinanceResult<usize> {
        self.storage.transactions.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetGoal, Category, CategoryType, GoalPeriod, MONTHLY_EXPENSES_GOAL};
    use crate::services::SummaryService;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn storage_with_goals(goals: &[&str]) -> Storage {
        let storage = Storage::in_memory();
        storage
            .categories
            .insert(Category::new("Food", "🍔", CategoryType::Expense))
            .unwrap();
        for goal in goals {
            storage
                .budget_goals
                .insert(BudgetGoal::new(*goal, Money::from_cents(100_000), GoalPeriod::Monthly))
                .unwrap();
        }
        storage
    }

    fn goal_current(storage: &Storage, category: &str) -> Money {
        storage.budget_goals.find(category).unwrap().unwrap().current
    }

    fn food(cents: i64) -> CreateTransactionInput {
        CreateTransactionInput::new(
            TransactionType::Expense,
            Money::from_cents(cents),
            "Food",
            ymd(2025, 1, 15),
        )
    }

    #[test]
    fn test_add_uses_category_emoji() {
        let storage = storage_with_goals(&[]);
        let service = TransactionService::new(&storage);

        let txn = service.add(food(500)).unwrap();
        assert_eq!(txn.emoji, "🍔");

        let other = service
            .add(CreateTransactionInput::new(
                TransactionType::Income,
                Money::from_cents(100),
                "Lottery",
                ymd(2025, 1, 15),
            ))
            .unwrap();
        assert_eq!(other.emoji, DEFAULT_EMOJI);

        let explicit = service.add(food(100).emoji("🥗")).unwrap();
        assert_eq!(explicit.emoji, "🥗");
    }

    #[test]
    fn test_add_prepends() {
        let storage = storage_with_goals(&[]);
        let service = TransactionService::new(&storage);

        let first = service.add(food(100)).unwrap();
        let second = service.add(food(200)).unwrap();

        let all = service.list_all().unwrap();
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
    }

    #[test]
    fn test_validation_rejects_bad_input() {
        let storage = storage_with_goals(&[]);
        let service = TransactionService::new(&storage);

        let zero = service.add(food(0));
        assert!(zero.unwrap_err().is_validation());

        let no_category = service.add(CreateTransactionInput::new(
            TransactionType::Expense,
            Money::from_cents(100),
            "   ",
            ymd(2025, 1, 15),
        ));
        assert!(no_category.unwrap_err().is_validation());
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_convention_goal_matching() {
        let storage = storage_with_goals(&["Food Budget", MONTHLY_EXPENSES_GOAL, "Food"]);
        let service = TransactionService::new(&storage);

        service.add(food(500)).unwrap();

        assert_eq!(goal_current(&storage, "Food Budget"), Money::from_cents(500));
        assert_eq!(goal_current(&storage, MONTHLY_EXPENSES_GOAL), Money::from_cents(500));
        assert_eq!(goal_current(&storage, "Food"), Money::zero());
    }

    #[test]
    fn test_exact_category_goal_matching() {
        let storage = storage_with_goals(&["Food Budget", MONTHLY_EXPENSES_GOAL, "Food"]);
        let service =
            TransactionService::new(&storage).with_goal_matching(GoalMatching::ExactCategory);

        service.add(food(500)).unwrap();

        assert_eq!(goal_current(&storage, "Food Budget"), Money::zero());
        assert_eq!(goal_current(&storage, MONTHLY_EXPENSES_GOAL), Money::from_cents(500));
        assert_eq!(goal_current(&storage, "Food"), Money::from_cents(500));
    }

    #[test]
    fn test_income_does_not_touch_goals() {
        let storage = storage_with_goals(&[MONTHLY_EXPENSES_GOAL]);
        let service = TransactionService::new(&storage);

        service
            .add(CreateTransactionInput::new(
                TransactionType::Income,
                Money::from_cents(250_000),
                "Salary",
                ymd(2025, 1, 1),
            ))
            .unwrap();

        assert_eq!(goal_current(&storage, MONTHLY_EXPENSES_GOAL), Money::zero());
    }

    #[test]
    fn test_add_then_delete_restores_totals_and_goals() {
        let storage = storage_with_goals(&["Food Budget"]);
        let service = TransactionService::new(&storage);
        let summary = SummaryService::new(&storage);
        let before = summary.totals().unwrap();

        let txn = service.add(food(1_250)).unwrap();
        assert_ne!(summary.totals().unwrap(), before);

        service.delete(&txn.id.to_string()).unwrap();
        assert_eq!(summary.totals().unwrap(), before);
        assert_eq!(goal_current(&storage, "Food Budget"), Money::zero());
    }

    #[test]
    fn test_goal_never_negative_after_reset() {
        let storage = storage_with_goals(&["Food Budget"]);
        let service = TransactionService::new(&storage);

        let txn = service.add(food(800)).unwrap();
        let mut goal = storage.budget_goals.find("Food Budget").unwrap().unwrap();
        goal.current = Money::zero();
        storage.budget_goals.update(goal).unwrap();

        service.delete(&txn.id.to_string()).unwrap();
        assert_eq!(goal_current(&storage, "Food Budget"), Money::zero());
    }

    #[test]
    fn test_delete_unknown_is_not_found() {
        let storage = storage_with_goals(&[]);
        let service = TransactionService::new(&storage);

        let err = service.delete("00000000-0000-0000-0000-000000000000").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_list_sorts_by_date() {
        let storage = storage_with_goals(&[]);
        let service = TransactionService::new(&storage);

        let mut early = food(100);
        early.date = ymd(2025, 1, 1);
        service.add(food(200)).unwrap();
        service.add(early).unwrap();

        let listed = service
            .list(&TransactionFilter::all_time(), ymd(2025, 2, 1))
            .unwrap();
        assert_eq!(listed[0].date, ymd(2025, 1, 15));
        assert_eq!(listed[1].date, ymd(2025, 1, 1));
    }

    #[test]
    fn test_mutations_are_persisted() {
        let storage = storage_with_goals(&["Food Budget"]);
        TransactionService::new(&storage).add(food(300)).unwrap();

        let raw = storage.store().get(keys::TRANSACTIONS).unwrap().unwrap();
        assert!(raw.contains("\"category\":\"Food\""));
        let goals = storage.store().get(keys::BUDGET_GOALS).unwrap().unwrap();
        assert!(goals.contains("\"current\":300"));
    }
}
