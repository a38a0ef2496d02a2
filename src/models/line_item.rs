//! Budget line items and the four-bucket budget sheet
//!
//! Income items carry a payday; needs, wants and savings share the expense
//! item shape. Labels are free text and need not be unique.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::money::Money;

/// One of the four line-item lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Income,
    Needs,
    Wants,
    Savings,
}

impl Bucket {
    pub const ALL: [Bucket; 4] = [Bucket::Income, Bucket::Needs, Bucket::Wants, Bucket::Savings];

    /// The three expense buckets of the 50/30/20 rule
    pub const EXPENSES: [Bucket; 3] = [Bucket::Needs, Bucket::Wants, Bucket::Savings];

    /// Storage key, also the `type` column of the relational store
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Income => "income",
            Bucket::Needs => "needs",
            Bucket::Wants => "wants",
            Bucket::Savings => "savings",
        }
    }

    /// Share of income the 50/30/20 rule assigns to this bucket
    pub fn target_ratio(&self) -> Option<f64> {
        match self {
            Bucket::Income => None,
            Bucket::Needs => Some(0.5),
            Bucket::Wants => Some(0.3),
            Bucket::Savings => Some(0.2),
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Bucket::Income => "Income",
            Bucket::Needs => "Needs",
            Bucket::Wants => "Wants",
            Bucket::Savings => "Savings",
        };
        f.pad(name)
    }
}

impl FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Bucket::Income),
            "needs" => Ok(Bucket::Needs),
            "wants" => Ok(Bucket::Wants),
            "savings" => Ok(Bucket::Savings),
            other => Err(format!("Unknown budget bucket: {}", other)),
        }
    }
}

/// Common shape of income and expense items, used by the aggregation functions
pub trait LineItem {
    fn label(&self) -> &str;
    fn budget(&self) -> Money;
    fn actual(&self) -> Money;
    fn set_budget(&mut self, amount: Money);
    fn set_actual(&mut self, amount: Money);
    fn set_label(&mut self, label: String);

    /// Zero both amounts, keeping the label
    fn zero_amounts(&mut self) {
        self.set_budget(Money::zero());
        self.set_actual(Money::zero());
    }
}

/// A source of income for the active period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeItem {
    pub subcategory: String,
    pub payday: NaiveDate,
    pub budget: Money,
    pub actual: Money,
}

impl IncomeItem {
    pub fn new(subcategory: impl Into<String>, payday: NaiveDate, budget: Money, actual: Money) -> Self {
        Self {
            subcategory: subcategory.into(),
            payday,
            budget,
            actual,
        }
    }
}

impl LineItem for IncomeItem {
    fn label(&self) -> &str {
        &self.subcategory
    }

    fn budget(&self) -> Money {
        self.budget
    }

    fn actual(&self) -> Money {
        self.actual
    }

    fn set_budget(&mut self, amount: Money) {
        self.budget = amount;
    }

    fn set_actual(&mut self, amount: Money) {
        self.actual = amount;
    }

    fn set_label(&mut self, label: String) {
        self.subcategory = label;
    }
}

/// A needs, wants or savings line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub category: String,
    pub budget: Money,
    pub actual: Money,
}

impl ExpenseItem {
    pub fn new(category: impl Into<String>, budget: Money, actual: Money) -> Self {
        Self {
            category: category.into(),
            budget,
            actual,
        }
    }
}

impl LineItem for ExpenseItem {
    fn label(&self) -> &str {
        &self.category
    }

    fn budget(&self) -> Money {
        self.budget
    }

    fn actual(&self) -> Money {
        self.actual
    }

    fn set_budget(&mut self, amount: Money) {
        self.budget = amount;
    }

    fn set_actual(&mut self, amount: Money) {
        self.actual = amount;
    }

    fn set_label(&mut self, label: String) {
        self.category = label;
    }
}

/// The complete set of line items for the active period
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BudgetSheet {
    pub income: Vec<IncomeItem>,
    pub needs: Vec<ExpenseItem>,
    pub wants: Vec<ExpenseItem>,
    pub savings: Vec<ExpenseItem>,
}

const DEFAULT_INCOME: &[(&str, (i32, u32, u32))] = &[
    ("Insurance Fund", (2025, 2, 2)),
    ("My Paycheck", (2025, 2, 4)),
];

const DEFAULT_NEEDS: &[&str] = &[
    "Housing (rent)",
    "Property taxes",
    "Groceries",
    "Transportation",
    "Insurance",
    "Debt repayment",
    "Loan",
    "Internet/Phone",
    "Utility fees",
];

const DEFAULT_WANTS: &[&str] = &[
    "Subscriptions",
    "Dining Out",
    "Hobbies",
    "Entertainment",
    "Shopping",
    "Personal Care",
    "Gifts",
    "Miscellaneous",
    "Pet Care",
];

const DEFAULT_SAVINGS: &[&str] = &[
    "Emergency Fund",
    "Vacation",
    "Retirement",
    "Investment Fund",
    "Home Repair",
    "Car",
];

// (budget, actual) in minor units, aligned with the default labels above
const SAMPLE_INCOME: &[(i64, i64)] = &[(74_500_000, 75_000_000), (55_500_000, 45_000_000)];

const SAMPLE_NEEDS: &[(i64, i64)] = &[
    (73_000_000, 8_600),
    (4_500_000, 231_500),
    (4_100_000, 775_000),
    (1_700_000, 1_410_000),
    (500_000, 483_200),
    (720_000, 4_100_000),
    (330_000, 3_125_000),
    (140_000, 3_100_000),
    (120_000, 2_410_000),
];

const SAMPLE_WANTS: &[(i64, i64)] = &[
    (70_000, 0),
    (6_450_000, 559_900),
    (1_000_000, 0),
    (8_300_000, 0),
    (7_000_000, 4_500_000),
    (500_000, 0),
    (3_350_000, 4_175_000),
    (5_400_000, 37_200),
    (5_850_000, 5_300_000),
];

const SAMPLE_SAVINGS: &[(i64, i64)] = &[
    (6_100_000, 8_600),
    (450_000, 370_000),
    (1_450_000, 0),
    (6_125_000, 3_135_000),
    (500_000, 0),
    (8_125_000, 56_000),
];

fn default_payday(ymd: (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2).unwrap_or_default()
}

fn expenses_from(labels: &[&str], amounts: Option<&[(i64, i64)]>) -> Vec<ExpenseItem> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let (budget, actual) = amounts.and_then(|a| a.get(i)).copied().unwrap_or((0, 0));
            ExpenseItem::new(*label, Money::from_cents(budget), Money::from_cents(actual))
        })
        .collect()
}

fn income_from(amounts: Option<&[(i64, i64)]>) -> Vec<IncomeItem> {
    DEFAULT_INCOME
        .iter()
        .enumerate()
        .map(|(i, (label, ymd))| {
            let (budget, actual) = amounts.and_then(|a| a.get(i)).copied().unwrap_or((0, 0));
            IncomeItem::new(
                *label,
                default_payday(*ymd),
                Money::from_cents(budget),
                Money::from_cents(actual),
            )
        })
        .collect()
}

impl BudgetSheet {
    /// The default labels with every amount at zero
    pub fn blank() -> Self {
        Self {
            income: income_from(None),
            needs: expenses_from(DEFAULT_NEEDS, None),
            wants: expenses_from(DEFAULT_WANTS, None),
            savings: expenses_from(DEFAULT_SAVINGS, None),
        }
    }

    /// The default labels filled with sample amounts
    pub fn sample() -> Self {
        Self {
            income: income_from(Some(SAMPLE_INCOME)),
            needs: expenses_from(DEFAULT_NEEDS, Some(SAMPLE_NEEDS)),
            wants: expenses_from(DEFAULT_WANTS, Some(SAMPLE_WANTS)),
            savings: expenses_from(DEFAULT_SAVINGS, Some(SAMPLE_SAVINGS)),
        }
    }

    /// The expense list for an expense bucket; `None` for income
    pub fn expenses(&self, bucket: Bucket) -> Option<&Vec<ExpenseItem>> {
        match bucket {
            Bucket::Income => None,
            Bucket::Needs => Some(&self.needs),
            Bucket::Wants => Some(&self.wants),
            Bucket::Savings => Some(&self.savings),
        }
    }

    pub fn expenses_mut(&mut self, bucket: Bucket) -> Option<&mut Vec<ExpenseItem>> {
        match bucket {
            Bucket::Income => None,
            Bucket::Needs => Some(&mut self.needs),
            Bucket::Wants => Some(&mut self.wants),
            Bucket::Savings => Some(&mut self.savings),
        }
    }

    /// Number of items in a bucket
    pub fn len(&self, bucket: Bucket) -> usize {
        match bucket {
            Bucket::Income => self.income.len(),
            Bucket::Needs => self.needs.len(),
            Bucket::Wants => self.wants.len(),
            Bucket::Savings => self.savings.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        Bucket::ALL.iter().all(|b| self.len(*b) == 0)
    }

    /// Labels of a bucket, in list order
    pub fn labels(&self, bucket: Bucket) -> Vec<&str> {
        match bucket {
            Bucket::Income => self.income.iter().map(|i| i.label()).collect(),
            _ => self
                .expenses(bucket)
                .map(|items| items.iter().map(|i| i.label()).collect())
                .unwrap_or_default(),
        }
    }

    /// Zero every amount, preserving labels and paydays
    pub fn zero_amounts(&mut self) {
        self.income.iter_mut().for_each(|i| i.zero_amounts());
        for bucket in Bucket::EXPENSES {
            if let Some(items) = self.expenses_mut(bucket) {
                items.iter_mut().for_each(|i| i.zero_amounts());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_round_trip_through_str() {
        for bucket in Bucket::ALL {
            assert_eq!(bucket.as_str().parse::<Bucket>().unwrap(), bucket);
        }
        assert!("rent".parse::<Bucket>().is_err());
    }

    #[test]
    fn test_target_ratios() {
        assert_eq!(Bucket::Income.target_ratio(), None);
        let total: f64 = Bucket::EXPENSES
            .iter()
            .filter_map(|b| b.target_ratio())
            .sum();
        assert!((total - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_blank_sheet_has_default_labels() {
        let sheet = BudgetSheet::blank();
        assert_eq!(sheet.income.len(), 2);
        assert_eq!(sheet.needs.len(), 9);
        assert_eq!(sheet.wants.len(), 9);
        assert_eq!(sheet.savings.len(), 6);
        assert!(sheet.needs.iter().all(|i| i.actual.is_zero()));
        assert_eq!(sheet.income[1].subcategory, "My Paycheck");
    }

    #[test]
    fn test_sample_sheet_amounts() {
        let sheet = BudgetSheet::sample();
        assert_eq!(sheet.income[0].actual, Money::from_major(750000));
        assert_eq!(sheet.needs[0].category, "Housing (rent)");
        assert_eq!(sheet.needs[0].actual, Money::from_major(86));
        assert_eq!(sheet.savings[5].budget, Money::from_major(81250));
    }

    #[test]
    fn test_zero_amounts_keeps_labels() {
        let mut sheet = BudgetSheet::sample();
        let labels_before: Vec<String> = sheet
            .labels(Bucket::Wants)
            .into_iter()
            .map(String::from)
            .collect();

        sheet.zero_amounts();

        assert!(sheet.wants.iter().all(|i| i.budget.is_zero() && i.actual.is_zero()));
        assert!(sheet.income.iter().all(|i| i.actual.is_zero()));
        assert_eq!(sheet.labels(Bucket::Wants), labels_before);
        assert_eq!(
            sheet.income[0].payday,
            NaiveDate::from_ymd_opt(2025, 2, 2).unwrap()
        );
    }

    #[test]
    fn test_expenses_accessor_rejects_income() {
        let sheet = BudgetSheet::blank();
        assert!(sheet.expenses(Bucket::Income).is_none());
        assert_eq!(sheet.expenses(Bucket::Savings).unwrap().len(), 6);
    }
}
