//! Daily transaction model
//!
//! A day-level log of income and expense entries. Transactions are never
//! reconciled against the budget line items.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::TransactionId;
use super::money::Money;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => f.pad("Income"),
            Self::Expense => f.pad("Expense"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Ok(Self::Income),
            "expense" | "out" => Ok(Self::Expense),
            other => Err(format!("Unknown transaction type: {}", other)),
        }
    }
}

/// Closed set of transaction categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionCategory {
    // Income
    Salary,
    Freelance,
    Investment,
    Business,
    Gift,
    OtherIncome,
    // Expense
    FoodAndDining,
    Transportation,
    Shopping,
    Entertainment,
    BillsAndUtilities,
    Healthcare,
    Education,
    Travel,
    Groceries,
    PersonalCare,
    OtherExpense,
}

impl TransactionCategory {
    pub const INCOME: [TransactionCategory; 6] = [
        Self::Salary,
        Self::Freelance,
        Self::Investment,
        Self::Business,
        Self::Gift,
        Self::OtherIncome,
    ];

    pub const EXPENSE: [TransactionCategory; 11] = [
        Self::FoodAndDining,
        Self::Transportation,
        Self::Shopping,
        Self::Entertainment,
        Self::BillsAndUtilities,
        Self::Healthcare,
        Self::Education,
        Self::Travel,
        Self::Groceries,
        Self::PersonalCare,
        Self::OtherExpense,
    ];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Salary => "Salary",
            Self::Freelance => "Freelance",
            Self::Investment => "Investment",
            Self::Business => "Business",
            Self::Gift => "Gift",
            Self::OtherIncome => "Other Income",
            Self::FoodAndDining => "Food & Dining",
            Self::Transportation => "Transportation",
            Self::Shopping => "Shopping",
            Self::Entertainment => "Entertainment",
            Self::BillsAndUtilities => "Bills & Utilities",
            Self::Healthcare => "Healthcare",
            Self::Education => "Education",
            Self::Travel => "Travel",
            Self::Groceries => "Groceries",
            Self::PersonalCare => "Personal Care",
            Self::OtherExpense => "Other Expense",
        }
    }

    /// The transaction type this category belongs to
    pub fn kind(&self) -> TransactionType {
        if Self::INCOME.contains(self) {
            TransactionType::Income
        } else {
            TransactionType::Expense
        }
    }

    /// Categories available for a transaction type
    pub fn for_type(kind: TransactionType) -> &'static [TransactionCategory] {
        match kind {
            TransactionType::Income => &Self::INCOME,
            TransactionType::Expense => &Self::EXPENSE,
        }
    }
}

impl fmt::Display for TransactionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for TransactionCategory {
    type Err = String;

    /// Matches the label case-insensitively, ignoring spaces, `&` and `-`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalize = |v: &str| -> String {
            v.chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(|c| c.to_lowercase())
                .collect()
        };
        let wanted = normalize(s);
        Self::INCOME
            .iter()
            .chain(Self::EXPENSE.iter())
            .find(|c| normalize(c.label()) == wanted)
            .copied()
            .ok_or_else(|| format!("Unknown transaction category: {}", s.trim()))
    }
}

/// A single day-level transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    /// Always positive; direction comes from `kind`
    pub amount: Money,

    pub description: String,

    pub category: TransactionCategory,

    #[serde(rename = "type")]
    pub kind: TransactionType,

    pub date: NaiveDate,

    pub time: NaiveTime,

    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        kind: TransactionType,
        amount: Money,
        description: impl Into<String>,
        category: TransactionCategory,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            amount,
            description: description.into(),
            category,
            kind,
            date,
            time,
            created_at: Utc::now(),
        }
    }

    /// Amount with sign applied: positive for income, negative for expense
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }

        if self.description.trim().is_empty() {
            return Err(TransactionValidationError::MissingDescription);
        }

        if self.category.kind() != self.kind {
            return Err(TransactionValidationError::CategoryMismatch {
                category: self.category,
                kind: self.kind,
            });
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.time.format("%H:%M"),
            self.description,
            self.signed_amount()
        )
    }
}

/// Per-day totals over the transaction log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DaySummary {
    pub income: Money,
    pub expense: Money,
}

impl DaySummary {
    /// Sum the transactions that fall on `date`
    pub fn for_date<'a>(
        transactions: impl IntoIterator<Item = &'a Transaction>,
        date: NaiveDate,
    ) -> Self {
        transactions
            .into_iter()
            .filter(|t| t.date == date)
            .fold(Self::default(), |mut acc, t| {
                match t.kind {
                    TransactionType::Income => acc.income += t.amount,
                    TransactionType::Expense => acc.expense += t.amount,
                }
                acc
            })
    }

    pub fn balance(&self) -> Money {
        self.income - self.expense
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(Money),
    MissingDescription,
    CategoryMismatch {
        category: TransactionCategory,
        kind: TransactionType,
    },
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Transaction amount must be greater than zero (got {})", amount)
            }
            Self::MissingDescription => write!(f, "Transaction description is required"),
            Self::CategoryMismatch { category, kind } => write!(
                f,
                "Category '{}' cannot be used for {} transactions",
                category,
                kind.as_str()
            ),
        }
    }
}

impl std::error::Error for TransactionValidationError {}
