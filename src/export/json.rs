//! JSON snapshot export
//!
//! The snapshot carries the four line-item lists plus a timestamp, under a
//! schema version so older files can be recognised.

use std::io::Write;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetSheet, ExpenseItem, IncomeItem};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSnapshot {
    pub schema_version: String,
    /// Application version that created the export
    pub app_version: String,
    pub income: Vec<IncomeItem>,
    pub needs: Vec<ExpenseItem>,
    pub wants: Vec<ExpenseItem>,
    pub savings: Vec<ExpenseItem>,
    pub timestamp: DateTime<Utc>,
}

impl BudgetSnapshot {
    pub fn new(sheet: BudgetSheet, timestamp: DateTime<Utc>) -> Self {
        let BudgetSheet {
            income,
            needs,
            wants,
            savings,
        } = sheet;
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            income,
            needs,
            wants,
            savings,
            timestamp,
        }
    }

    pub fn sheet(&self) -> BudgetSheet {
        BudgetSheet {
            income: self.income.clone(),
            needs: self.needs.clone(),
            wants: self.wants.clone(),
            savings: self.savings.clone(),
        }
    }
}

/// `budget-data-YYYY-MM-DD.json`
pub fn default_file_name(date: NaiveDate) -> String {
    format!("budget-data-{}.json", date.format("%Y-%m-%d"))
}

pub fn export_json<W: Write>(snapshot: &BudgetSnapshot, writer: &mut W, pretty: bool) -> BudgetResult<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, snapshot)
    } else {
        serde_json::to_writer(&mut *writer, snapshot)
    }
    .map_err(|e| BudgetError::Export(e.to_string()))?;

    writeln!(writer).map_err(|e| BudgetError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn snapshot() -> BudgetSnapshot {
        let at = Utc.with_ymd_and_hms(2025, 2, 14, 9, 30, 0).unwrap();
        BudgetSnapshot::new(BudgetSheet::sample(), at)
    }

    #[test]
    fn test_default_file_name() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 4).unwrap();
        assert_eq!(default_file_name(date), "budget-data-2025-02-04.json");
    }

    #[test]
    fn test_snapshot_fields() {
        let mut out = Vec::new();
        export_json(&snapshot(), &mut out, true).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["schema_version"], EXPORT_SCHEMA_VERSION);
        assert_eq!(value["income"].as_array().unwrap().len(), 2);
        assert_eq!(value["needs"][2]["category"], "Groceries");
        assert_eq!(value["timestamp"], "2025-02-14T09:30:00Z");
    }

    #[test]
    fn test_snapshot_reads_back() {
        let mut out = Vec::new();
        export_json(&snapshot(), &mut out, false).unwrap();

        let back: BudgetSnapshot = serde_json::from_slice(&out).unwrap();
        assert_eq!(back.sheet(), BudgetSheet::sample());
    }
}
