//! Transaction repository for JSON storage
//!
//! Manages loading and saving the daily transaction log to transactions.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::BudgetError;
use crate::models::{Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};
use super::TransactionStore;

/// Serializable transaction data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Newest first: date, then time of day, then creation order
pub(crate) fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then(b.time.cmp(&a.time))
            .then(b.created_at.cmp(&a.created_at))
    });
}

/// Repository for the local transaction log
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk
    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for txn in file_data.transactions {
            data.insert(txn.id, txn);
        }

        Ok(())
    }

    /// Save transactions to disk
    pub fn save(&self) -> Result<(), BudgetError> {
        let data = self.data.read().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        sort_newest_first(&mut transactions);

        let file_data = TransactionData { transactions };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, BudgetError> {
        let data = self.data.read().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// All transactions, newest first
    pub fn get_all(&self) -> Result<Vec<Transaction>, BudgetError> {
        let data = self.data.read().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    pub fn get_by_date(&self, date: NaiveDate) -> Result<Vec<Transaction>, BudgetError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|t| t.date == date)
            .collect())
    }

    /// Insert or update a transaction
    pub fn upsert(&self, txn: Transaction) -> Result<(), BudgetError> {
        let mut data = self.data.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(txn.id, txn);
        Ok(())
    }

    pub fn delete(&self, id: TransactionId) -> Result<bool, BudgetError> {
        let mut data = self.data.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, BudgetError> {
        let data = self.data.read().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}

impl TransactionStore for TransactionRepository {
    fn list(&self) -> Result<Vec<Transaction>, BudgetError> {
        self.get_all()
    }

    fn insert(&self, txn: &Transaction) -> Result<(), BudgetError> {
        self.upsert(txn.clone())?;
        self.save()
    }

    fn update(&self, txn: &Transaction) -> Result<(), BudgetError> {
        if self.get(txn.id)?.is_none() {
            return Err(BudgetError::transaction_not_found(txn.id.to_string()));
        }
        self.upsert(txn.clone())?;
        self.save()
    }

    fn delete(&self, id: TransactionId) -> Result<bool, BudgetError> {
        let removed = TransactionRepository::delete(self, id)?;
        if removed {
            self.save()?;
        }
        Ok(removed)
    }
}
