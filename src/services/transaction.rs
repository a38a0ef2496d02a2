//! Transaction service
//!
//! Business logic for the daily transaction ledger: validated create, edit
//! and delete against the active store, plus per-day summaries.

use chrono::{Local, NaiveDate, NaiveTime, Timelike};

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    DaySummary, Money, Transaction, TransactionCategory, TransactionId, TransactionType,
};
use crate::storage::Storage;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub kind: TransactionType,
    pub amount: Money,
    pub description: String,
    pub category: TransactionCategory,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    /// Defaults to now
    pub time: Option<NaiveTime>,
}

/// Changes to an existing transaction; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    pub kind: Option<TransactionType>,
    pub amount: Option<Money>,
    pub description: Option<String>,
    pub category: Option<TransactionCategory>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a new transaction
    pub fn create(&self, input: CreateTransactionInput) -> BudgetResult<Transaction> {
        let now = Local::now();
        let txn = Transaction::new(
            input.kind,
            input.amount,
            input.description.trim(),
            input.category,
            input.date.unwrap_or_else(|| now.date_naive()),
            whole_seconds(input.time.unwrap_or_else(|| now.time())),
        );
        txn.validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.storage.transaction_store()?.insert(&txn)?;
        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.description.clone()),
            &txn,
        )?;

        tracing::info!(id = %txn.id, kind = %txn.kind, "transaction recorded");
        Ok(txn)
    }

    /// All transactions, newest first
    pub fn list(&self) -> BudgetResult<Vec<Transaction>> {
        self.storage.transaction_store()?.list()
    }

    /// Transactions on one date, newest first
    pub fn list_for_date(&self, date: NaiveDate) -> BudgetResult<Vec<Transaction>> {
        let mut transactions = self.list()?;
        transactions.retain(|t| t.date == date);
        Ok(transactions)
    }

    /// Find a transaction by full id or a short prefix of it
    pub fn find(&self, reference: &str) -> BudgetResult<Transaction> {
        let reference = reference.trim();
        let mut matches: Vec<Transaction> = self
            .list()?
            .into_iter()
            .filter(|t| t.id.matches(reference))
            .collect();

        match matches.len() {
            1 => Ok(matches.remove(0)),
            0 => Err(BudgetError::transaction_not_found(reference)),
            n => Err(BudgetError::Validation(format!(
                "'{}' matches {} transactions; use more of the id",
                reference, n
            ))),
        }
    }

    /// Edit a transaction, keeping its id and creation time
    pub fn update(&self, reference: &str, input: UpdateTransactionInput) -> BudgetResult<Transaction> {
        let before = self.find(reference)?;
        let mut txn = before.clone();

        if let Some(kind) = input.kind {
            txn.kind = kind;
        }
        if let Some(amount) = input.amount {
            txn.amount = amount;
        }
        if let Some(description) = input.description {
            txn.description = description.trim().to_string();
        }
        if let Some(category) = input.category {
            txn.category = category;
        }
        if let Some(date) = input.date {
            txn.date = date;
        }
        if let Some(time) = input.time {
            txn.time = whole_seconds(time);
        }

        txn.validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.storage.transaction_store()?.update(&txn)?;
        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.description.clone()),
            &before,
            &txn,
        )?;

        Ok(txn)
    }

    /// Delete a transaction
    pub fn delete(&self, reference: &str) -> BudgetResult<Transaction> {
        let txn = self.find(reference)?;
        if !self.storage.transaction_store()?.delete(txn.id)? {
            return Err(BudgetError::transaction_not_found(txn.id.to_string()));
        }

        self.storage.log_delete(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.description.clone()),
            &txn,
        )?;

        Ok(txn)
    }

    /// Income, expense and balance for one date
    pub fn day_summary(&self, date: NaiveDate) -> BudgetResult<DaySummary> {
        Ok(DaySummary::for_date(&self.list()?, date))
    }

    pub fn get(&self, id: TransactionId) -> BudgetResult<Option<Transaction>> {
        Ok(self.list()?.into_iter().find(|t| t.id == id))
    }
}

/// Stored times carry no sub-second part
fn whole_seconds(time: NaiveTime) -> NaiveTime {
    time.with_nanosecond(0).unwrap_or(time)
}
