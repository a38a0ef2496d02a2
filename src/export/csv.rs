//! CSV export of the transaction ledger

use std::io::Write;

use serde::Serialize;

use crate::error::{BudgetError, BudgetResult};
use crate::models::Transaction;

#[derive(Serialize)]
struct Row<'a> {
    id: String,
    date: String,
    time: String,
    #[serde(rename = "type")]
    kind: &'static str,
    category: &'static str,
    description: &'a str,
    amount: String,
}

/// Write one row per transaction, in the order given
pub fn export_transactions_csv<W: Write>(transactions: &[Transaction], writer: W) -> BudgetResult<usize> {
    let mut out = ::csv::Writer::from_writer(writer);

    for txn in transactions {
        out.serialize(Row {
            id: txn.id.to_string(),
            date: txn.date.format("%Y-%m-%d").to_string(),
            time: txn.time.format("%H:%M:%S").to_string(),
            kind: txn.kind.as_str(),
            category: txn.category.label(),
            description: &txn.description,
            amount: format!("{}.{:02}", txn.amount.major(), txn.amount.cents_part()),
        })?;
    }
    out.flush().map_err(|e| BudgetError::Export(e.to_string()))?;

    Ok(transactions.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, TransactionCategory, TransactionType};
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn test_transactions_csv() {
        let txn = Transaction::new(
            TransactionType::Expense,
            Money::from_cents(45_050),
            "Dinner, with \"friends\"",
            TransactionCategory::FoodAndDining,
            NaiveDate::from_ymd_opt(2025, 2, 14).unwrap(),
            NaiveTime::from_hms_opt(20, 15, 0).unwrap(),
        );

        let mut out = Vec::new();
        assert_eq!(export_transactions_csv(&[txn], &mut out).unwrap(), 1);

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("id,date,time,type,category,description,amount"));
        let row = lines.next().unwrap();
        assert!(row.contains("2025-02-14,20:15:00,expense,Food & Dining"));
        assert!(row.contains("\"Dinner, with \"\"friends\"\"\""));
        assert!(row.ends_with(",450.50"));
    }

    #[test]
    fn test_empty_ledger_writes_nothing() {
        let mut out = Vec::new();
        assert_eq!(export_transactions_csv(&[], &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }
}
