//! Local line-item lists
//!
//! Each bucket lives in its own JSON file under `data/`. A bucket whose file
//! has never been written reads as the sample list for that bucket.

use std::path::PathBuf;

use crate::config::paths::AppPaths;
use crate::error::BudgetResult;
use crate::models::{BudgetSheet, Bucket, ExpenseItem, IncomeItem};

use super::file_io::{read_json_optional, write_json_atomic};
use super::BudgetStore;

/// Line-item lists stored as JSON files on this device
pub struct LocalBudgetStore {
    paths: AppPaths,
}

impl LocalBudgetStore {
    pub fn new(paths: AppPaths) -> Self {
        Self { paths }
    }

    fn file(&self, bucket: Bucket) -> PathBuf {
        self.paths.bucket_file(bucket)
    }

    /// Whether any bucket has been written yet
    pub fn has_data(&self) -> bool {
        !self.saved_buckets().is_empty()
    }

    /// Buckets with a file on this device
    pub fn saved_buckets(&self) -> Vec<Bucket> {
        Bucket::ALL
            .into_iter()
            .filter(|b| self.file(*b).exists())
            .collect()
    }

    /// Only the buckets written on this device; unwritten buckets are empty
    pub fn load_saved(&self) -> BudgetResult<BudgetSheet> {
        Ok(BudgetSheet {
            income: read_json_optional(self.file(Bucket::Income))?.unwrap_or_default(),
            needs: self.load_expenses(Bucket::Needs, Vec::new())?,
            wants: self.load_expenses(Bucket::Wants, Vec::new())?,
            savings: self.load_expenses(Bucket::Savings, Vec::new())?,
        })
    }

    fn load_expenses(&self, bucket: Bucket, fallback: Vec<ExpenseItem>) -> BudgetResult<Vec<ExpenseItem>> {
        Ok(read_json_optional(self.file(bucket))?.unwrap_or(fallback))
    }
}

impl BudgetStore for LocalBudgetStore {
    fn load(&self) -> BudgetResult<BudgetSheet> {
        let sample = BudgetSheet::sample();
        let income: Option<Vec<IncomeItem>> = read_json_optional(self.file(Bucket::Income))?;

        Ok(BudgetSheet {
            income: income.unwrap_or(sample.income),
            needs: self.load_expenses(Bucket::Needs, sample.needs)?,
            wants: self.load_expenses(Bucket::Wants, sample.wants)?,
            savings: self.load_expenses(Bucket::Savings, sample.savings)?,
        })
    }

    fn save(&self, bucket: Bucket, sheet: &BudgetSheet) -> BudgetResult<()> {
        let path = self.file(bucket);
        match bucket {
            Bucket::Income => write_json_atomic(&path, &sheet.income)?,
            Bucket::Needs => write_json_atomic(&path, &sheet.needs)?,
            Bucket::Wants => write_json_atomic(&path, &sheet.wants)?,
            Bucket::Savings => write_json_atomic(&path, &sheet.savings)?,
        }
        tracing::debug!(bucket = bucket.as_str(), path = %path.display(), "saved line items");
        Ok(())
    }
}
