//! Sums, percentages and the derived budget totals
//!
//! Every figure here is a pure function of the current line-item lists and
//! is recomputed on each call; nothing is cached or persisted.

use crate::models::{BudgetSheet, LineItem, Money};

/// Sum of the budgeted amounts
pub fn sum_budget<T: LineItem>(items: &[T]) -> Money {
    items.iter().map(|i| i.budget()).sum()
}

/// Sum of the actual amounts
pub fn sum_actual<T: LineItem>(items: &[T]) -> Money {
    items.iter().map(|i| i.actual()).sum()
}

/// `part / whole * 100`, or 0 when `whole` is not positive
pub fn percent_of(part: Money, whole: Money) -> f64 {
    if whole.is_positive() {
        part.cents() as f64 * 100.0 / whole.cents() as f64
    } else {
        0.0
    }
}

/// `part / whole`, or 0 when `whole` is not positive
pub fn ratio_of(part: Money, whole: Money) -> f64 {
    if whole.is_positive() {
        part.cents() as f64 / whole.cents() as f64
    } else {
        0.0
    }
}

/// Derived aggregates over the actual amounts of a budget sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetTotals {
    pub income: Money,
    pub needs: Money,
    pub wants: Money,
    pub savings: Money,
}

impl BudgetTotals {
    pub fn new(income: Money, needs: Money, wants: Money, savings: Money) -> Self {
        Self {
            income,
            needs,
            wants,
            savings,
        }
    }

    /// Totals of the actual column
    pub fn from_sheet(sheet: &BudgetSheet) -> Self {
        Self {
            income: sum_actual(&sheet.income),
            needs: sum_actual(&sheet.needs),
            wants: sum_actual(&sheet.wants),
            savings: sum_actual(&sheet.savings),
        }
    }

    /// Totals of the budgeted column
    pub fn budgeted(sheet: &BudgetSheet) -> Self {
        Self {
            income: sum_budget(&sheet.income),
            needs: sum_budget(&sheet.needs),
            wants: sum_budget(&sheet.wants),
            savings: sum_budget(&sheet.savings),
        }
    }

    pub fn expenses(&self) -> Money {
        self.needs + self.wants + self.savings
    }

    /// Income minus all three expense buckets; negative is a deficit
    pub fn leftover(&self) -> Money {
        self.income - self.expenses()
    }

    pub fn is_surplus(&self) -> bool {
        !self.leftover().is_negative()
    }

    /// "Surplus" or "Deficit", by the sign of the leftover
    pub fn balance_label(&self) -> &'static str {
        if self.is_surplus() {
            "Surplus"
        } else {
            "Deficit"
        }
    }

    pub fn needs_percent(&self) -> f64 {
        percent_of(self.needs, self.income)
    }

    pub fn wants_percent(&self) -> f64 {
        percent_of(self.wants, self.income)
    }

    pub fn savings_percent(&self) -> f64 {
        percent_of(self.savings, self.income)
    }

    pub fn needs_ratio(&self) -> f64 {
        ratio_of(self.needs, self.income)
    }

    pub fn wants_ratio(&self) -> f64 {
        ratio_of(self.wants, self.income)
    }

    pub fn savings_ratio(&self) -> f64 {
        ratio_of(self.savings, self.income)
    }

    /// Savings as a percentage of income
    pub fn savings_rate(&self) -> f64 {
        self.savings_percent()
    }

    /// 100 minus the mean absolute deviation from 50/30/20, in percent
    ///
    /// Not clamped: a sheet far enough off target scores below zero.
    pub fn compliance(&self) -> f64 {
        if !self.income.is_positive() {
            return 0.0;
        }

        let deviation = (self.needs_ratio() - 0.5).abs()
            + (self.wants_ratio() - 0.3).abs()
            + (self.savings_ratio() - 0.2).abs();

        100.0 - deviation * 100.0 / 3.0
    }

    /// The 50/30/20 split of the current income
    pub fn recommended_allocation(&self) -> (Money, Money, Money) {
        (
            self.income.scale(0.5),
            self.income.scale(0.3),
            self.income.scale(0.2),
        )
    }
}
