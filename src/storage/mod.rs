//! Storage layer for the budget tracker
//!
//! Local JSON files with atomic writes for guest use, and a relational store
//! for signed-in users. Both sides implement the same [`BudgetStore`] and
//! [`TransactionStore`] contracts so services never know which is active.

pub mod budget;
pub mod file_io;
pub mod goals;
pub mod remote;
pub mod state;
pub mod transactions;

use std::sync::{Arc, Mutex};

pub use budget::LocalBudgetStore;
pub use file_io::{read_json, write_json_atomic};
pub use goals::GoalRepository;
pub use remote::{MigrationOutcome, RemoteBudgetStore, RemoteDatabase, RemoteTransactionStore};
pub use state::StateRepository;
pub use transactions::TransactionRepository;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::AppPaths;
use crate::config::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetSheet, Bucket, Transaction, TransactionId, UserId};

/// Persistence contract for the four line-item lists
pub trait BudgetStore {
    /// Load all four lists
    fn load(&self) -> BudgetResult<BudgetSheet>;

    /// Write back one bucket's list from `sheet`
    fn save(&self, bucket: Bucket, sheet: &BudgetSheet) -> BudgetResult<()>;

    /// Zero every amount, keeping labels
    fn reset(&self) -> BudgetResult<()> {
        let mut sheet = self.load()?;
        sheet.zero_amounts();
        for bucket in Bucket::ALL {
            self.save(bucket, &sheet)?;
        }
        Ok(())
    }
}

/// Persistence contract for the daily transaction log
pub trait TransactionStore {
    /// All transactions, newest first
    fn list(&self) -> BudgetResult<Vec<Transaction>>;
    fn insert(&self, txn: &Transaction) -> BudgetResult<()>;
    /// Fails with not-found when the id is unknown
    fn update(&self, txn: &Transaction) -> BudgetResult<()>;
    fn delete(&self, id: TransactionId) -> BudgetResult<bool>;
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: AppPaths,
    settings: Settings,
    pub local_budget: LocalBudgetStore,
    pub local_transactions: TransactionRepository,
    pub goals: GoalRepository,
    pub state: StateRepository,
    audit: AuditLogger,
    remote: Mutex<Option<Arc<RemoteDatabase>>>,
}

impl Storage {
    /// Create a new Storage instance and load the local repositories
    pub fn new(paths: AppPaths) -> Result<Self, BudgetError> {
        paths.ensure_directories()?;
        let settings = Settings::load_or_create(&paths)?;

        let storage = Self {
            local_budget: LocalBudgetStore::new(paths.clone()),
            local_transactions: TransactionRepository::new(paths.transactions_file()),
            goals: GoalRepository::new(paths.goals_file()),
            state: StateRepository::new(paths.state_file()),
            audit: AuditLogger::new(paths.audit_log()),
            remote: Mutex::new(None),
            settings,
            paths,
        };
        storage.local_transactions.load()?;
        storage.goals.load()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> BudgetResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> BudgetResult<()> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> BudgetResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    /// The relational store, opened on first use
    pub fn remote(&self) -> BudgetResult<Arc<RemoteDatabase>> {
        let mut slot = self
            .remote
            .lock()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire lock: {}", e)))?;
        if let Some(db) = slot.as_ref() {
            return Ok(db.clone());
        }
        let path = self.settings.remote_database_path(&self.paths);
        tracing::debug!(path = %path.display(), "opening relational store");
        let db = Arc::new(RemoteDatabase::open(&path)?);
        *slot = Some(db.clone());
        Ok(db)
    }

    /// The signed-in user, if any
    pub fn signed_in_user(&self) -> BudgetResult<Option<UserId>> {
        Ok(self.state.load()?.session.map(|s| s.user_id))
    }

    /// The line-item store for the current mode
    pub fn budget_store(&self) -> BudgetResult<Box<dyn BudgetStore + '_>> {
        match self.signed_in_user()? {
            Some(user) => Ok(Box::new(RemoteBudgetStore::new(self.remote()?, user))),
            None => Ok(Box::new(&self.local_budget)),
        }
    }

    /// The transaction store for the current mode
    pub fn transaction_store(&self) -> BudgetResult<Box<dyn TransactionStore + '_>> {
        match self.signed_in_user()? {
            Some(user) => Ok(Box::new(RemoteTransactionStore::new(self.remote()?, user))),
            None => Ok(Box::new(&self.local_transactions)),
        }
    }
}

impl<T: BudgetStore + ?Sized> BudgetStore for &T {
    fn load(&self) -> BudgetResult<BudgetSheet> {
        (**self).load()
    }

    fn save(&self, bucket: Bucket, sheet: &BudgetSheet) -> BudgetResult<()> {
        (**self).save(bucket, sheet)
    }

    fn reset(&self) -> BudgetResult<()> {
        (**self).reset()
    }
}

impl<T: TransactionStore + ?Sized> TransactionStore for &T {
    fn list(&self) -> BudgetResult<Vec<Transaction>> {
        (**self).list()
    }

    fn insert(&self, txn: &Transaction) -> BudgetResult<()> {
        (**self).insert(txn)
    }

    fn update(&self, txn: &Transaction) -> BudgetResult<()> {
        (**self).update(txn)
    }

    fn delete(&self, id: TransactionId) -> BudgetResult<bool> {
        (**self).delete(id)
    }
}
