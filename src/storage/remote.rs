//! Relational store for signed-in users
//!
//! A SQLite database holding per-user line items and transactions, plus the
//! account tables used by the database auth provider. Each bucket save
//! replaces that bucket's rows inside one transaction and marks the bucket
//! as saved, so an emptied list stays empty.

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    BudgetSheet, Bucket, ExpenseItem, IncomeItem, Money, Transaction, TransactionCategory,
    TransactionId, TransactionType, UserId,
};

use super::transactions::sort_newest_first;
use super::{BudgetStore, TransactionStore};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS credentials (
    user_id       TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password_hash TEXT NOT NULL,
    created_at    TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS profiles (
    user_id    TEXT PRIMARY KEY,
    email      TEXT NOT NULL,
    full_name  TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS sessions (
    token      TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS password_resets (
    token      TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS budget_data (
    user_id      TEXT NOT NULL,
    type         TEXT NOT NULL,
    position     INTEGER NOT NULL,
    label        TEXT NOT NULL,
    payday       TEXT,
    budget_cents INTEGER NOT NULL,
    actual_cents INTEGER NOT NULL,
    PRIMARY KEY (user_id, type, position)
);
CREATE TABLE IF NOT EXISTS saved_buckets (
    user_id  TEXT NOT NULL,
    type     TEXT NOT NULL,
    saved_at TEXT NOT NULL,
    PRIMARY KEY (user_id, type)
);
CREATE TABLE IF NOT EXISTS transactions (
    id           TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL,
    amount_cents INTEGER NOT NULL,
    description  TEXT NOT NULL,
    category     TEXT NOT NULL,
    type         TEXT NOT NULL,
    date         TEXT NOT NULL,
    time         TEXT NOT NULL,
    created_at   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_transactions_user ON transactions (user_id, date);
CREATE TABLE IF NOT EXISTS migrations (
    user_id     TEXT PRIMARY KEY,
    migrated_at TEXT NOT NULL
);
"#;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Outcome of copying local data into the relational store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    Migrated {
        line_items: usize,
        transactions: usize,
    },
    /// A previous migration for this user already ran
    AlreadyMigrated,
}

/// Shared handle to the relational store
pub struct RemoteDatabase {
    conn: Mutex<Connection>,
}

impl RemoteDatabase {
    /// Open (creating if needed) the database file and apply the schema
    pub fn open(path: &Path) -> BudgetResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> BudgetResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> BudgetResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` with exclusive access to the connection
    pub(crate) fn with_conn<T, F>(&self, f: F) -> BudgetResult<T>
    where
        F: FnOnce(&mut Connection) -> BudgetResult<T>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| BudgetError::Database(format!("Failed to acquire connection: {}", e)))?;
        f(&mut conn)
    }

    /// Number of line-item rows stored for a user
    pub fn line_item_count(&self, user_id: UserId) -> BudgetResult<usize> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM budget_data WHERE user_id = ?1",
                [user_id.as_uuid().to_string()],
                |row| row.get(0),
            )?;
            Ok(count as usize)
        })
    }

    /// Load a user's sheet; buckets never saved get the blank default list
    pub fn load_sheet(&self, user_id: UserId) -> BudgetResult<BudgetSheet> {
        let mut sheet = BudgetSheet::blank();
        self.with_conn(|conn| {
            let user = user_id.as_uuid().to_string();
            if is_bucket_saved(conn, &user, Bucket::Income)? {
                sheet.income = load_income(conn, &user)?;
            }
            for bucket in [Bucket::Needs, Bucket::Wants, Bucket::Savings] {
                if !is_bucket_saved(conn, &user, bucket)? {
                    continue;
                }
                let items = load_expenses(conn, &user, bucket)?;
                if let Some(slot) = sheet.expenses_mut(bucket) {
                    *slot = items;
                }
            }
            Ok(sheet)
        })
    }

    /// Replace one bucket's rows for a user
    pub fn save_bucket(&self, user_id: UserId, bucket: Bucket, sheet: &BudgetSheet) -> BudgetResult<()> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            replace_bucket(&tx, &user_id.as_uuid().to_string(), bucket, sheet)?;
            tx.commit()?;
            Ok(())
        })
    }

    pub fn list_transactions(&self, user_id: UserId) -> BudgetResult<Vec<Transaction>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, amount_cents, description, category, type, date, time, created_at
                FROM transactions
                WHERE user_id = ?1
                "#,
            )?;
            let rows = stmt.query_map([user_id.as_uuid().to_string()], raw_transaction)?;

            let mut out = Vec::new();
            for row in rows {
                out.push(row??);
            }
            sort_newest_first(&mut out);
            Ok(out)
        })
    }

    pub fn insert_transaction(&self, user_id: UserId, txn: &Transaction) -> BudgetResult<()> {
        self.with_conn(|conn| {
            insert_transaction_row(conn, &user_id.as_uuid().to_string(), txn, false)?;
            Ok(())
        })
    }

    pub fn update_transaction(&self, user_id: UserId, txn: &Transaction) -> BudgetResult<()> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                r#"
                UPDATE transactions
                SET amount_cents = ?1, description = ?2, category = ?3, type = ?4,
                    date = ?5, time = ?6
                WHERE id = ?7 AND user_id = ?8
                "#,
                params![
                    txn.amount.cents(),
                    txn.description,
                    txn.category.label(),
                    txn.kind.as_str(),
                    txn.date.format(DATE_FORMAT).to_string(),
                    txn.time.format(TIME_FORMAT).to_string(),
                    txn.id.as_uuid().to_string(),
                    user_id.as_uuid().to_string(),
                ],
            )?;
            if changed == 0 {
                return Err(BudgetError::transaction_not_found(txn.id.to_string()));
            }
            Ok(())
        })
    }

    pub fn delete_transaction(&self, user_id: UserId, id: TransactionId) -> BudgetResult<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "DELETE FROM transactions WHERE id = ?1 AND user_id = ?2",
                params![id.as_uuid().to_string(), user_id.as_uuid().to_string()],
            )?;
            Ok(changed > 0)
        })
    }

    /// Copy local data into the store, once per user
    ///
    /// Only `buckets` are copied from `local`. The marker insert and the copy
    /// share one transaction, so two racing sessions cannot both copy.
    /// Buckets the user already saved remotely are left as they are.
    pub fn migrate(
        &self,
        user_id: UserId,
        local: &BudgetSheet,
        buckets: &[Bucket],
        transactions: &[Transaction],
    ) -> BudgetResult<MigrationOutcome> {
        self.with_conn(|conn| {
            let user = user_id.as_uuid().to_string();
            let tx = conn.transaction()?;

            let inserted = tx.execute(
                "INSERT OR IGNORE INTO migrations (user_id, migrated_at) VALUES (?1, ?2)",
                params![user, Utc::now().to_rfc3339()],
            )?;
            if inserted == 0 {
                return Ok(MigrationOutcome::AlreadyMigrated);
            }

            let mut line_items = 0;
            for &bucket in buckets {
                if !is_bucket_saved(&tx, &user, bucket)? {
                    line_items += replace_bucket(&tx, &user, bucket, local)?;
                }
            }

            let mut copied = 0;
            for txn in transactions {
                copied += insert_transaction_row(&tx, &user, txn, true)?;
            }

            tx.commit()?;
            Ok(MigrationOutcome::Migrated {
                line_items,
                transactions: copied,
            })
        })
    }

    pub fn is_migrated(&self, user_id: UserId) -> BudgetResult<bool> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM migrations WHERE user_id = ?1",
                [user_id.as_uuid().to_string()],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
    }
}

fn is_bucket_saved(conn: &Connection, user: &str, bucket: Bucket) -> BudgetResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM saved_buckets WHERE user_id = ?1 AND type = ?2",
        params![user, bucket.as_str()],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn replace_bucket(tx: &Connection, user: &str, bucket: Bucket, sheet: &BudgetSheet) -> BudgetResult<usize> {
    tx.execute(
        "DELETE FROM budget_data WHERE user_id = ?1 AND type = ?2",
        params![user, bucket.as_str()],
    )?;
    tx.execute(
        "INSERT OR REPLACE INTO saved_buckets (user_id, type, saved_at) VALUES (?1, ?2, ?3)",
        params![user, bucket.as_str(), Utc::now().to_rfc3339()],
    )?;

    let mut stmt = tx.prepare(
        r#"
        INSERT INTO budget_data (user_id, type, position, label, payday, budget_cents, actual_cents)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )?;

    let mut count = 0;
    match sheet.expenses(bucket) {
        None => {
            for (position, item) in sheet.income.iter().enumerate() {
                stmt.execute(params![
                    user,
                    bucket.as_str(),
                    position as i64,
                    item.subcategory,
                    Some(item.payday.format(DATE_FORMAT).to_string()),
                    item.budget.cents(),
                    item.actual.cents(),
                ])?;
                count += 1;
            }
        }
        Some(items) => {
            for (position, item) in items.iter().enumerate() {
                stmt.execute(params![
                    user,
                    bucket.as_str(),
                    position as i64,
                    item.category,
                    None::<String>,
                    item.budget.cents(),
                    item.actual.cents(),
                ])?;
                count += 1;
            }
        }
    }

    Ok(count)
}

fn load_income(conn: &Connection, user: &str) -> BudgetResult<Vec<IncomeItem>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT label, payday, budget_cents, actual_cents
        FROM budget_data
        WHERE user_id = ?1 AND type = 'income'
        ORDER BY position
        "#,
    )?;
    let rows = stmt.query_map([user], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, Option<String>>(1)?,
            row.get::<_, i64>(2)?,
            row.get::<_, i64>(3)?,
        ))
    })?;

    let mut out = Vec::new();
    for row in rows {
        let (label, payday, budget, actual) = row?;
        let payday = payday
            .as_deref()
            .map(parse_date)
            .transpose()?
            .unwrap_or_else(|| Utc::now().date_naive());
        out.push(IncomeItem::new(
            label,
            payday,
            Money::from_cents(budget),
            Money::from_cents(actual),
        ));
    }
    Ok(out)
}

fn load_expenses(conn: &Connection, user: &str, bucket: Bucket) -> BudgetResult<Vec<ExpenseItem>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT label, budget_cents, actual_cents
        FROM budget_data
        WHERE user_id = ?1 AND type = ?2
        ORDER BY position
        "#,
    )?;
    let rows = stmt.query_map(params![user, bucket.as_str()], |row| {
        Ok(ExpenseItem::new(
            row.get::<_, String>(0)?,
            Money::from_cents(row.get(1)?),
            Money::from_cents(row.get(2)?),
        ))
    })?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Insert a transaction row; returns the number of rows written
fn insert_transaction_row(conn: &Connection, user: &str, txn: &Transaction, ignore_existing: bool) -> BudgetResult<usize> {
    let verb = if ignore_existing {
        "INSERT OR IGNORE"
    } else {
        "INSERT"
    };
    let sql = format!(
        "{} INTO transactions (id, user_id, amount_cents, description, category, type, date, time, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        verb
    );
    let written = conn.execute(
        &sql,
        params![
            txn.id.as_uuid().to_string(),
            user,
            txn.amount.cents(),
            txn.description,
            txn.category.label(),
            txn.kind.as_str(),
            txn.date.format(DATE_FORMAT).to_string(),
            txn.time.format(TIME_FORMAT).to_string(),
            txn.created_at.to_rfc3339(),
        ],
    )?;
    Ok(written)
}

fn parse_date(s: &str) -> BudgetResult<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| BudgetError::Database(format!("Invalid stored date '{}': {}", s, e)))
}

/// Decode a transaction row; the outer result is rusqlite's, the inner ours
fn raw_transaction(row: &Row<'_>) -> rusqlite::Result<BudgetResult<Transaction>> {
    let id: String = row.get(0)?;
    let amount: i64 = row.get(1)?;
    let description: String = row.get(2)?;
    let category: String = row.get(3)?;
    let kind: String = row.get(4)?;
    let date: String = row.get(5)?;
    let time: String = row.get(6)?;
    let created_at: String = row.get(7)?;

    Ok(decode_transaction(
        &id,
        amount,
        description,
        &category,
        &kind,
        &date,
        &time,
        &created_at,
    ))
}

#[allow(clippy::too_many_arguments)]
fn decode_transaction(
    id: &str,
    amount: i64,
    description: String,
    category: &str,
    kind: &str,
    date: &str,
    time: &str,
    created_at: &str,
) -> BudgetResult<Transaction> {
    let invalid = |what: &str, value: &str| {
        BudgetError::Database(format!("Invalid stored {} '{}'", what, value))
    };

    let id: TransactionId = id.parse().map_err(|_| invalid("transaction id", id))?;
    let category: TransactionCategory = category.parse().map_err(|_| invalid("category", category))?;
    let kind: TransactionType = kind.parse().map_err(|_| invalid("type", kind))?;
    let time = NaiveTime::parse_from_str(time, TIME_FORMAT).map_err(|_| invalid("time", time))?;
    let created_at = DateTime::parse_from_rfc3339(created_at)
        .map_err(|_| invalid("timestamp", created_at))?
        .with_timezone(&Utc);

    Ok(Transaction {
        id,
        amount: Money::from_cents(amount),
        description,
        category,
        kind,
        date: parse_date(date)?,
        time,
        created_at,
    })
}

/// Line items of one signed-in user
pub struct RemoteBudgetStore {
    db: Arc<RemoteDatabase>,
    user_id: UserId,
}

impl RemoteBudgetStore {
    pub fn new(db: Arc<RemoteDatabase>, user_id: UserId) -> Self {
        Self { db, user_id }
    }
}

impl BudgetStore for RemoteBudgetStore {
    fn load(&self) -> BudgetResult<BudgetSheet> {
        self.db.load_sheet(self.user_id)
    }

    fn save(&self, bucket: Bucket, sheet: &BudgetSheet) -> BudgetResult<()> {
        self.db.save_bucket(self.user_id, bucket, sheet)?;
        tracing::debug!(bucket = bucket.as_str(), user = %self.user_id, "saved line items");
        Ok(())
    }
}

/// Transaction log of one signed-in user
pub struct RemoteTransactionStore {
    db: Arc<RemoteDatabase>,
    user_id: UserId,
}

impl RemoteTransactionStore {
    pub fn new(db: Arc<RemoteDatabase>, user_id: UserId) -> Self {
        Self { db, user_id }
    }
}

impl TransactionStore for RemoteTransactionStore {
    fn list(&self) -> BudgetResult<Vec<Transaction>> {
        self.db.list_transactions(self.user_id)
    }

    fn insert(&self, txn: &Transaction) -> BudgetResult<()> {
        self.db.insert_transaction(self.user_id, txn)
    }

    fn update(&self, txn: &Transaction) -> BudgetResult<()> {
        self.db.update_transaction(self.user_id, txn)
    }

    fn delete(&self, id: TransactionId) -> BudgetResult<bool> {
        self.db.delete_transaction(self.user_id, id)
    }
}
