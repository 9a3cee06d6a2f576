//! Recurring transaction service
//!
//! Definitions are templates. Processing one materializes an ordinary
//! transaction through `TransactionService` (so budget goals follow) and
//! moves the definition's `next_date` forward by one interval.

use chrono::{Days, NaiveDate};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{
    Frequency, GoalMatching, Money, RecurringId, RecurringTransaction, Transaction,
    TransactionType,
};
use crate::storage::{keys, Storage};

use super::transaction::{CreateTransactionInput, TransactionService};

/// Most occurrences a single definition may catch up in one `process_due` run
pub const MAX_CATCH_UP: usize = 400;

/// Most projected occurrences per definition in `upcoming`
const MAX_UPCOMING: usize = 100;

/// Service for recurring transactions
pub struct RecurringService<'a> {
    storage: &'a Storage,
    clock: &'a dyn Clock,
    matching: GoalMatching,
}

/// Input for creating a recurring transaction
#[derive(Debug, Clone)]
pub struct CreateRecurringInput {
    pub name: String,
    pub kind: TransactionType,
    pub amount: Money,
    pub category: String,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub note: Option<String>,
}

/// Changes to apply to a definition; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct RecurringUpdate {
    pub name: Option<String>,
    pub amount: Option<Money>,
    pub category: Option<String>,
    pub frequency: Option<Frequency>,
    pub next_date: Option<NaiveDate>,
    /// `Some(None)` clears the end date
    pub end_date: Option<Option<NaiveDate>>,
    pub note: Option<String>,
}

/// Outcome of a `process_due` run
#[derive(Debug, Clone, Default)]
pub struct DueProcessingReport {
    pub created: Vec<Transaction>,
    /// Definitions still due after hitting `MAX_CATCH_UP`
    pub capped: Vec<String>,
    /// Definitions that stopped on an error, with the reason
    pub failed: Vec<(String, String)>,
}

impl DueProcessingReport {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.capped.is_empty() && self.failed.is_empty()
    }
}

/// A projected future (or overdue) occurrence
#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingOccurrence {
    pub recurring_id: RecurringId,
    pub name: String,
    pub kind: TransactionType,
    pub amount: Money,
    pub category: String,
    pub date: NaiveDate,
    pub overdue: bool,
}

impl<'a> RecurringService<'a> {
    pub fn new(storage: &'a Storage, clock: &'a dyn Clock) -> Self {
        Self {
            storage,
            clock,
            matching: GoalMatching::default(),
        }
    }

    pub fn with_goal_matching(mut self, matching: GoalMatching) -> Self {
        self.matching = matching;
        self
    }

    /// Create an active definition; its first occurrence is `start_date`
    pub fn create(&self, input: CreateRecurringInput) -> FinanceResult<RecurringTransaction> {
        let mut recurring = RecurringTransaction::new(
            input.name.trim(),
            input.kind,
            input.amount,
            input.category.trim(),
            input.frequency,
            input.start_date,
        );
        recurring.end_date = input.end_date;
        recurring.note = input.note.filter(|n| !n.trim().is_empty());
        recurring.created_at = self.clock.now();

        recurring
            .validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;

        self.storage.recurring.insert(recurring.clone())?;
        self.storage.persist(keys::RECURRING_TRANSACTIONS);

        info!(name = %recurring.name, frequency = %recurring.frequency, "Created recurring transaction");
        Ok(recurring)
    }

    pub fn find(&self, identifier: &str) -> FinanceResult<Option<RecurringTransaction>> {
        self.storage.recurring.find(identifier)
    }

    pub fn get(&self, identifier: &str) -> FinanceResult<RecurringTransaction> {
        self.find(identifier)?
            .ok_or_else(|| FinanceError::recurring_not_found(identifier))
    }

    pub fn list(&self) -> FinanceResult<Vec<RecurringTransaction>> {
        self.storage.recurring.get_all()
    }

    fn save(&self, recurring: &RecurringTransaction, identifier: &str) -> FinanceResult<()> {
        if !self.storage.recurring.update(recurring.clone())? {
            return Err(FinanceError::recurring_not_found(identifier));
        }
        self.storage.persist(keys::RECURRING_TRANSACTIONS);
        Ok(())
    }

    pub fn update(&self, identifier: &str, update: RecurringUpdate) -> FinanceResult<RecurringTransaction> {
        let mut recurring = self.get(identifier)?;

        if let Some(name) = update.name {
            recurring.name = name.trim().to_string();
        }
        if let Some(amount) = update.amount {
            recurring.amount = amount;
        }
        if let Some(category) = update.category {
            recurring.category = category.trim().to_string();
        }
        if let Some(frequency) = update.frequency {
            recurring.frequency = frequency;
        }
        if let Some(next_date) = update.next_date {
            recurring.next_date = next_date;
        }
        if let Some(end_date) = update.end_date {
            recurring.end_date = end_date;
        }
        if let Some(note) = update.note {
            recurring.note = Some(note).filter(|n| !n.trim().is_empty());
        }

        recurring
            .validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;
        self.save(&recurring, identifier)?;
        Ok(recurring)
    }

    /// Pause an active definition or resume a paused one
    pub fn toggle(&self, identifier: &str) -> FinanceResult<RecurringTransaction> {
        let mut recurring = self.get(identifier)?;
        recurring.toggle();
        self.save(&recurring, identifier)?;

        info!(name = %recurring.name, active = recurring.active, "Toggled recurring transaction");
        Ok(recurring)
    }

    pub fn delete(&self, identifier: &str) -> FinanceResult<RecurringTransaction> {
        let recurring = self.get(identifier)?;
        self.storage
            .recurring
            .remove(recurring.id)?
            .ok_or_else(|| FinanceError::recurring_not_found(identifier))?;
        self.storage.persist(keys::RECURRING_TRANSACTIONS);

        info!(name = %recurring.name, "Deleted recurring transaction");
        Ok(recurring)
    }

    fn materialize(&self, recurring: &RecurringTransaction, date: NaiveDate) -> FinanceResult<Transaction> {
        let input = CreateTransactionInput::new(
            recurring.kind,
            recurring.amount,
            recurring.category.clone(),
            date,
        )
        .note(recurring.materialized_note());

        TransactionService::new(self.storage)
            .with_goal_matching(self.matching)
            .add(input)
    }

    /// Process one definition now.
    ///
    /// Adds a transaction dated today and advances `next_date` by one
    /// interval from its current value. Returns `None` without changing
    /// anything when the definition is missing or paused.
    pub fn process(&self, identifier: &str) -> FinanceResult<Option<Transaction>> {
        let Some(mut recurring) = self.find(identifier)? else {
            debug!(identifier, "No recurring transaction to process");
            return Ok(None);
        };
        if !recurring.active {
            debug!(name = %recurring.name, "Skipping paused recurring transaction");
            return Ok(None);
        }

        let next = recurring.frequency.advance(recurring.next_date).ok_or_else(|| {
            FinanceError::Validation(format!("'{}' cannot be scheduled further", recurring.name))
        })?;

        let txn = self.materialize(&recurring, self.clock.today())?;

        recurring.next_date = next;
        recurring.last_processed = Some(self.clock.now());
        self.save(&recurring, identifier)?;

        info!(name = %recurring.name, next = %recurring.next_date, "Processed recurring transaction");
        Ok(Some(txn))
    }

    /// Active definitions whose next occurrence is on or before `today`
    pub fn due(&self, today: NaiveDate) -> FinanceResult<Vec<RecurringTransaction>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|r| r.is_due(today))
            .collect())
    }

    /// Materialize every occurrence that has come due.
    ///
    /// Missed intervals are caught up one at a time, each transaction dated
    /// at its scheduled occurrence. Stops at the end date.
    pub fn process_due(&self, today: NaiveDate) -> FinanceResult<DueProcessingReport> {
        let mut report = DueProcessingReport::default();
        let mut dirty = false;

        for mut recurring in self.list()? {
            let mut processed = 0;

            while recurring.is_due(today) && processed < MAX_CATCH_UP {
                let Some(next) = recurring.frequency.advance(recurring.next_date) else {
                    break;
                };
                match self.materialize(&recurring, recurring.next_date) {
                    Ok(txn) => report.created.push(txn),
                    Err(e) => {
                        warn!(name = %recurring.name, error = %e, "Stopped processing recurring transaction");
                        report.failed.push((recurring.name.clone(), e.to_string()));
                        break;
                    }
                }
                recurring.next_date = next;
                processed += 1;
            }

            if processed == MAX_CATCH_UP && recurring.is_due(today) {
                warn!(name = %recurring.name, "Catch-up limit reached, more occurrences remain");
                report.capped.push(recurring.name.clone());
            }

            if processed > 0 {
                recurring.last_processed = Some(self.clock.now());
                self.storage.recurring.update(recurring)?;
                dirty = true;
            }
        }

        if dirty {
            self.storage.persist(keys::RECURRING_TRANSACTIONS);
        }
        if !report.created.is_empty() {
            info!(count = report.created.len(), "Processed due recurring transactions");
        }
        Ok(report)
    }

    /// Occurrences of active definitions from now until `horizon_days` ahead.
    ///
    /// Overdue occurrences are included and flagged.
    pub fn upcoming(&self, today: NaiveDate, horizon_days: u64) -> FinanceResult<Vec<UpcomingOccurrence>> {
        let until = today
            .checked_add_days(Days::new(horizon_days))
            .unwrap_or(NaiveDate::MAX);

        let mut occurrences: Vec<UpcomingOccurrence> = self
            .list()?
            .into_iter()
            .filter(|r| r.active)
            .flat_map(|r| {
                r.occurrences_until(until, MAX_UPCOMING)
                    .into_iter()
                    .map(move |date| UpcomingOccurrence {
                        recurring_id: r.id,
                        name: r.name.clone(),
                        kind: r.kind,
                        amount: r.amount,
                        category: r.category.clone(),
                        date,
                        overdue: date < today,
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        occurrences.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
        Ok(occurrences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::{BudgetGoal, GoalPeriod};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rent(start: NaiveDate) -> CreateRecurringInput {
        CreateRecurringInput {
            name: "Rent".into(),
            kind: TransactionType::Expense,
            amount: Money::from_cents(120_000),
            category: "Housing".into(),
            frequency: Frequency::Monthly,
            start_date: start,
            end_date: None,
            note: None,
        }
    }

    #[test]
    fn test_process_advances_from_next_date() {
        let storage = Storage::in_memory();
        let clock = FixedClock::on(ymd(2024, 1, 31));
        let service = RecurringService::new(&storage, &clock);
        service.create(rent(ymd(2024, 1, 31))).unwrap();

        let txn = service.process("Rent").unwrap().unwrap();
        assert_eq!(txn.date, ymd(2024, 1, 31));
        assert_eq!(txn.note.as_deref(), Some("Recurring: Rent"));
        assert_eq!(txn.kind, TransactionType::Expense);

        let rent = service.get("Rent").unwrap();
        assert_eq!(rent.next_date, ymd(2024, 2, 29));
        assert_eq!(rent.last_processed, Some(clock.now()));
    }

    #[test]
    fn test_month_end_in_common_year() {
        let storage = Storage::in_memory();
        let clock = FixedClock::on(ymd(2023, 1, 31));
        let service = RecurringService::new(&storage, &clock);
        service.create(rent(ymd(2023, 1, 31))).unwrap();

        service.process("Rent").unwrap();
        assert_eq!(service.get("Rent").unwrap().next_date, ymd(2023, 2, 28));
    }

    #[test]
    fn test_process_paused_or_missing_is_noop() {
        let storage = Storage::in_memory();
        let clock = FixedClock::on(ymd(2024, 6, 1));
        let service = RecurringService::new(&storage, &clock);
        service.create(rent(ymd(2024, 6, 1))).unwrap();
        service.toggle("Rent").unwrap();

        assert!(service.process("Rent").unwrap().is_none());
        assert!(service.process("Gym").unwrap().is_none());
        assert_eq!(storage.transactions.count().unwrap(), 0);
        assert_eq!(service.get("Rent").unwrap().next_date, ymd(2024, 6, 1));
    }

    #[test]
    fn test_process_updates_goals() {
        let storage = Storage::in_memory();
        storage
            .budget_goals
            .insert(BudgetGoal::new("Housing Budget", Money::from_cents(200_000), GoalPeriod::Monthly))
            .unwrap();
        let clock = FixedClock::on(ymd(2024, 6, 1));
        let service = RecurringService::new(&storage, &clock);
        service.create(rent(ymd(2024, 6, 1))).unwrap();

        service.process("Rent").unwrap();
        let goal = storage.budget_goals.find("Housing Budget").unwrap().unwrap();
        assert_eq!(goal.current, Money::from_cents(120_000));
    }

    #[test]
    fn test_process_due_catches_up() {
        let storage = Storage::in_memory();
        let clock = FixedClock::on(ymd(2024, 4, 15));
        let service = RecurringService::new(&storage, &clock);
        service.create(rent(ymd(2024, 1, 31))).unwrap();

        let report = service.process_due(clock.today()).unwrap();
        let dates: Vec<_> = report.created.iter().map(|t| t.date).collect();
        assert_eq!(
            dates,
            vec![ymd(2024, 1, 31), ymd(2024, 2, 29), ymd(2024, 3, 29)]
        );
        assert_eq!(service.get("Rent").unwrap().next_date, ymd(2024, 4, 29));

        // Nothing left to do
        assert!(service.process_due(clock.today()).unwrap().is_empty());
    }

    #[test]
    fn test_process_due_respects_end_date_and_pause() {
        let storage = Storage::in_memory();
        let clock = FixedClock::on(ymd(2024, 3, 1));
        let service = RecurringService::new(&storage, &clock);

        let mut weekly = rent(ymd(2024, 1, 1));
        weekly.name = "Cleaner".into();
        weekly.frequency = Frequency::Weekly;
        weekly.end_date = Some(ymd(2024, 1, 20));
        service.create(weekly).unwrap();

        let mut paused = rent(ymd(2024, 1, 1));
        paused.name = "Gym".into();
        service.create(paused).unwrap();
        service.toggle("Gym").unwrap();

        let report = service.process_due(clock.today()).unwrap();
        assert_eq!(report.created.len(), 3);
        assert!(report.created.iter().all(|t| t.date <= ymd(2024, 1, 20)));
        assert!(service.due(clock.today()).unwrap().is_empty());
    }

    #[test]
    fn test_upcoming() {
        let storage = Storage::in_memory();
        let clock = FixedClock::on(ymd(2024, 5, 10));
        let service = RecurringService::new(&storage, &clock);

        let mut weekly = rent(ymd(2024, 5, 8));
        weekly.name = "Groceries".into();
        weekly.frequency = Frequency::Weekly;
        service.create(weekly).unwrap();
        service.create(rent(ymd(2024, 6, 1))).unwrap();

        let upcoming = service.upcoming(clock.today(), 30).unwrap();
        assert!(upcoming[0].overdue);
        assert_eq!(upcoming[0].date, ymd(2024, 5, 8));
        assert_eq!(upcoming.len(), 6);
        assert!(upcoming.iter().any(|o| o.name == "Rent" && o.date == ymd(2024, 6, 1)));
    }

    #[test]
    fn test_create_validates() {
        let storage = Storage::in_memory();
        let clock = FixedClock::on(ymd(2024, 5, 10));
        let service = RecurringService::new(&storage, &clock);

        let mut bad = rent(ymd(2024, 5, 10));
        bad.end_date = Some(ymd(2024, 5, 1));
        assert!(service.create(bad).unwrap_err().is_validation());

        let mut zero = rent(ymd(2024, 5, 10));
        zero.amount = Money::zero();
        assert!(service.create(zero).unwrap_err().is_validation());
    }

    #[test]
    fn test_update_and_delete() {
        let storage = Storage::in_memory();
        let clock = FixedClock::on(ymd(2024, 5, 10));
        let service = RecurringService::new(&storage, &clock);
        service.create(rent(ymd(2024, 5, 10))).unwrap();

        let updated = service
            .update(
                "Rent",
                RecurringUpdate {
                    amount: Some(Money::from_cents(130_000)),
                    end_date: Some(Some(ymd(2025, 5, 1))),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.amount, Money::from_cents(130_000));
        assert_eq!(updated.end_date, Some(ymd(2025, 5, 1)));

        service.delete("Rent").unwrap();
        assert!(service.list().unwrap().is_empty());
    }
}
