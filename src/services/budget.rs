//! Line-item service
//!
//! Adds, edits and removes income, needs, wants and savings lines in the
//! active store, and derives the aggregates every command shows.

use chrono::NaiveDate;
use serde::Serialize;

use crate::analysis::{health, suggestions, BudgetTotals, HealthReport, Suggestion};
use crate::audit::{AuditEntry, EntityType};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetSheet, Bucket, ExpenseItem, IncomeItem, LineItem, Money};
use crate::storage::{BudgetStore, Storage};

/// Service for line-item management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

/// Fields for adding or editing a line item; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct LineItemInput {
    pub label: Option<String>,
    /// Income lines only
    pub payday: Option<NaiveDate>,
    pub budget: Option<Money>,
    pub actual: Option<Money>,
}

/// Everything the summary screens show, derived from one load
#[derive(Debug, Clone)]
pub struct BudgetOverview {
    pub sheet: BudgetSheet,
    pub totals: BudgetTotals,
    pub budgeted: BudgetTotals,
    pub health: HealthReport,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Current line items from the active store
    pub fn sheet(&self) -> BudgetResult<BudgetSheet> {
        self.storage.budget_store()?.load()
    }

    /// Aggregates over the actual amounts
    pub fn totals(&self) -> BudgetResult<BudgetTotals> {
        Ok(BudgetTotals::from_sheet(&self.sheet()?))
    }

    pub fn overview(&self) -> BudgetResult<BudgetOverview> {
        let sheet = self.sheet()?;
        let totals = BudgetTotals::from_sheet(&sheet);
        Ok(BudgetOverview {
            budgeted: BudgetTotals::budgeted(&sheet),
            health: health::evaluate(&totals),
            totals,
            sheet,
        })
    }

    pub fn suggestions(&self) -> BudgetResult<Vec<Suggestion>> {
        Ok(suggestions::suggest(&self.totals()?))
    }

    /// Append a line to a bucket, returning its 1-based position
    pub fn add(&self, bucket: Bucket, input: LineItemInput) -> BudgetResult<usize> {
        validate_input(bucket, &input)?;
        let label = match input.label.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => return Err(BudgetError::Validation("A label is required".into())),
        };
        let budget = input.budget.unwrap_or_default();
        let actual = input.actual.unwrap_or_default();

        let store = self.storage.budget_store()?;
        let mut sheet = store.load()?;
        let (position, entry) = match sheet.expenses_mut(bucket) {
            Some(items) => {
                let item = ExpenseItem::new(label.clone(), budget, actual);
                items.push(item.clone());
                (items.len(), create_entry(bucket, items.len(), &label, &item))
            }
            None => {
                let payday = input
                    .payday
                    .unwrap_or_else(|| chrono::Local::now().date_naive());
                let item = IncomeItem::new(label.clone(), payday, budget, actual);
                sheet.income.push(item.clone());
                let position = sheet.income.len();
                (position, create_entry(bucket, position, &label, &item))
            }
        };
        store.save(bucket, &sheet)?;
        self.storage.audit().log(&entry)?;

        tracing::info!(bucket = bucket.as_str(), position, "line item added");
        Ok(position)
    }

    /// Edit the line at `reference` (1-based position or unique label)
    pub fn update(&self, bucket: Bucket, reference: &str, input: LineItemInput) -> BudgetResult<usize> {
        validate_input(bucket, &input)?;
        if let Some(label) = &input.label {
            if label.trim().is_empty() {
                return Err(BudgetError::Validation("A label is required".into()));
            }
        }

        let store = self.storage.budget_store()?;
        let mut sheet = store.load()?;
        let (index, entry) = match sheet.expenses_mut(bucket) {
            Some(items) => {
                let index = resolve(items, bucket, reference)?;
                let before = items[index].clone();
                apply(&mut items[index], &input);
                (index, update_entry(bucket, index, &before, &items[index]))
            }
            None => {
                let index = resolve(&sheet.income, bucket, reference)?;
                let item = &mut sheet.income[index];
                let before = item.clone();
                apply(item, &input);
                if let Some(payday) = input.payday {
                    item.payday = payday;
                }
                (index, update_entry(bucket, index, &before, &*item))
            }
        };
        store.save(bucket, &sheet)?;
        self.storage.audit().log(&entry)?;

        Ok(index + 1)
    }

    /// Remove the line at `reference`, returning its label
    pub fn remove(&self, bucket: Bucket, reference: &str) -> BudgetResult<String> {
        let store = self.storage.budget_store()?;
        let mut sheet = store.load()?;
        let (label, entry) = match sheet.expenses_mut(bucket) {
            Some(items) => {
                let index = resolve(items, bucket, reference)?;
                let removed = items.remove(index);
                let entry = delete_entry(bucket, index, &removed);
                (removed.category, entry)
            }
            None => {
                let index = resolve(&sheet.income, bucket, reference)?;
                let removed = sheet.income.remove(index);
                let entry = delete_entry(bucket, index, &removed);
                (removed.subcategory, entry)
            }
        };
        store.save(bucket, &sheet)?;
        self.storage.audit().log(&entry)?;

        tracing::info!(bucket = bucket.as_str(), label = %label, "line item removed");
        Ok(label)
    }

    /// Zero every amount in every bucket, keeping the labels
    pub fn reset(&self) -> BudgetResult<()> {
        self.storage.budget_store()?.reset()?;
        tracing::info!("budget amounts reset");
        Ok(())
    }

    /// Write a starting sheet to this device and save the settings file
    ///
    /// Returns false without writing when local line items already exist.
    pub fn initialize(&self, sample: bool) -> BudgetResult<bool> {
        if self.storage.local_budget.has_data() {
            return Ok(false);
        }

        let sheet = if sample {
            BudgetSheet::sample()
        } else {
            BudgetSheet::blank()
        };
        for bucket in Bucket::ALL {
            self.storage.local_budget.save(bucket, &sheet)?;
        }
        self.storage.settings().save(self.storage.paths())?;
        tracing::info!(sample, "budget initialized");
        Ok(true)
    }
}

fn create_entry<T: Serialize>(bucket: Bucket, position: usize, label: &str, item: &T) -> AuditEntry {
    AuditEntry::create(
        EntityType::LineItem,
        line_item_id(bucket, position),
        Some(label.to_string()),
        item,
    )
}

fn update_entry<T: Serialize + LineItem>(bucket: Bucket, index: usize, before: &T, after: &T) -> AuditEntry {
    AuditEntry::update(
        EntityType::LineItem,
        line_item_id(bucket, index + 1),
        Some(after.label().to_string()),
        before,
        after,
    )
}

fn delete_entry<T: Serialize + LineItem>(bucket: Bucket, index: usize, item: &T) -> AuditEntry {
    AuditEntry::delete(
        EntityType::LineItem,
        line_item_id(bucket, index + 1),
        Some(item.label().to_string()),
        item,
    )
}

fn line_item_id(bucket: Bucket, position: usize) -> String {
    format!("{}#{}", bucket.as_str(), position)
}

fn validate_input(bucket: Bucket, input: &LineItemInput) -> BudgetResult<()> {
    for (field, amount) in [("Budget", input.budget), ("Actual", input.actual)] {
        if amount.is_some_and(|a| a.is_negative()) {
            return Err(BudgetError::Validation(format!(
                "{} amount cannot be negative",
                field
            )));
        }
    }
    if input.payday.is_some() && bucket != Bucket::Income {
        return Err(BudgetError::Validation(
            "Only income lines have a payday".into(),
        ));
    }
    Ok(())
}

fn apply<T: LineItem>(item: &mut T, input: &LineItemInput) {
    if let Some(label) = &input.label {
        item.set_label(label.trim().to_string());
    }
    if let Some(budget) = input.budget {
        item.set_budget(budget);
    }
    if let Some(actual) = input.actual {
        item.set_actual(actual);
    }
}

/// Index of the line a user reference points at
///
/// A number is a 1-based position; anything else must match exactly one
/// label, ignoring case.
pub fn resolve<T: LineItem>(items: &[T], bucket: Bucket, reference: &str) -> BudgetResult<usize> {
    let reference = reference.trim();
    let not_found = || BudgetError::line_item_not_found(format!("{} '{}'", bucket, reference));

    if let Ok(position) = reference.parse::<usize>() {
        return if (1..=items.len()).contains(&position) {
            Ok(position - 1)
        } else {
            Err(not_found())
        };
    }

    let matches: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.label().eq_ignore_ascii_case(reference))
        .map(|(index, _)| index)
        .collect();

    match matches.as_slice() {
        [index] => Ok(*index),
        [] => Err(not_found()),
        _ => Err(BudgetError::Validation(format!(
            "'{}' matches {} {} lines; use its position instead",
            reference,
            matches.len(),
            bucket
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::AppPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn amounts(budget: i64, actual: i64) -> LineItemInput {
        LineItemInput {
            budget: Some(Money::from_major(budget)),
            actual: Some(Money::from_major(actual)),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_expense_line() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let before = service.sheet().unwrap().needs.len();

        let input = LineItemInput {
            label: Some("  Phone bill ".into()),
            ..amounts(800, 750)
        };
        let position = service.add(Bucket::Needs, input).unwrap();

        let sheet = service.sheet().unwrap();
        assert_eq!(position, before + 1);
        assert_eq!(sheet.needs[before].category, "Phone bill");
        assert_eq!(sheet.needs[before].actual, Money::from_major(750));
    }

    #[test]
    fn test_add_requires_label() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        let err = service.add(Bucket::Wants, amounts(1, 1)).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_failed_save_writes_no_audit_entry() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let blocker = storage.paths().bucket_file(Bucket::Wants).with_extension("json.tmp");
        std::fs::create_dir_all(&blocker).unwrap();

        let input = LineItemInput {
            label: Some("Concerts".into()),
            ..Default::default()
        };
        assert!(service.add(Bucket::Wants, input).is_err());
        assert!(service.remove(Bucket::Wants, "1").is_err());
        assert!(storage.audit().read_all().unwrap().is_empty());

        std::fs::remove_dir(&blocker).unwrap();
        service.remove(Bucket::Wants, "1").unwrap();
        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Delete);
    }

    #[test]
    fn test_negative_amount_rejected_before_store() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        let err = service
            .update(Bucket::Needs, "1", amounts(-5, 0))
            .unwrap_err();
        assert_eq!(err.user_message(), "Budget amount cannot be negative");
        assert!(storage.audit().read_all().unwrap().is_empty());
    }

    #[test]
    fn test_payday_only_on_income() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let input = LineItemInput {
            payday: NaiveDate::from_ymd_opt(2025, 3, 1),
            ..Default::default()
        };

        assert!(service.update(Bucket::Savings, "1", input.clone()).is_err());
        service.update(Bucket::Income, "My Paycheck", input).unwrap();
        assert_eq!(
            service.sheet().unwrap().income[1].payday,
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_update_by_label_is_case_insensitive() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        let position = service
            .update(Bucket::Needs, "groceries", amounts(12000, 11000))
            .unwrap();

        let sheet = service.sheet().unwrap();
        assert_eq!(sheet.needs[position - 1].category, "Groceries");
        assert_eq!(sheet.needs[position - 1].budget, Money::from_major(12000));

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Update);
        assert!(entries[0].diff_summary.is_some());
    }

    #[test]
    fn test_remove_and_missing_references() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let count = service.sheet().unwrap().wants.len();

        let label = service.remove(Bucket::Wants, "1").unwrap();
        let sheet = service.sheet().unwrap();
        assert_eq!(sheet.wants.len(), count - 1);
        assert!(!sheet.labels(Bucket::Wants).contains(&label.as_str()));

        assert!(service.remove(Bucket::Wants, "0").unwrap_err().is_not_found());
        assert!(service.remove(Bucket::Wants, "99").unwrap_err().is_not_found());
        assert!(service
            .remove(Bucket::Wants, "No such line")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_ambiguous_label_needs_position() {
        let items = vec![
            ExpenseItem::new("Misc", Money::zero(), Money::zero()),
            ExpenseItem::new("misc", Money::zero(), Money::zero()),
        ];
        assert!(resolve(&items, Bucket::Wants, "MISC").unwrap_err().is_validation());
        assert_eq!(resolve(&items, Bucket::Wants, "2").unwrap(), 1);
    }

    #[test]
    fn test_reset_keeps_labels() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let labels: Vec<String> = service
            .sheet()
            .unwrap()
            .labels(Bucket::Needs)
            .into_iter()
            .map(String::from)
            .collect();

        service.reset().unwrap();

        let sheet = service.sheet().unwrap();
        assert_eq!(sheet.labels(Bucket::Needs), labels);
        assert!(service.totals().unwrap().income.is_zero());
    }

    #[test]
    fn test_overview_matches_sample() {
        let (_temp_dir, storage) = create_test_storage();
        let overview = BudgetService::new(&storage).overview().unwrap();

        assert_eq!(overview.sheet, BudgetSheet::sample());
        assert_eq!(overview.totals.income, Money::from_major(1_200_000));
        assert!(overview.health.score <= 100);
    }

    #[test]
    fn test_initialize_blank_once() {
        let (temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        assert!(service.initialize(false).unwrap());
        assert!(temp_dir.path().join("config.json").exists());
        assert_eq!(service.sheet().unwrap(), BudgetSheet::blank());

        // existing data is never overwritten
        assert!(!service.initialize(true).unwrap());
        assert_eq!(service.sheet().unwrap(), BudgetSheet::blank());
    }
}
