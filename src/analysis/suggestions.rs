//! Quick-action suggestions derived from the current totals

use std::fmt;

use super::aggregate::BudgetTotals;
use crate::models::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn badge(&self) -> &'static str {
        match self {
            Priority::High => "High Priority",
            Priority::Medium => "Recommended",
            Priority::Low => "Optional",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.badge())
    }
}

/// Figures carried by a suggestion for the follow-up action
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionData {
    Allocation {
        needs: Money,
        wants: Money,
        savings: Money,
    },
    EmergencyFund {
        amount: Money,
    },
    WantsReview {
        current: Money,
        recommended: Money,
    },
    IncomeGap {
        deficit: Money,
        current_income: Money,
    },
    SavingsRate {
        current_rate: f64,
        target_rate: f64,
    },
    AvailableSavings {
        amount: Money,
    },
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub priority: Priority,
    pub data: ActionData,
}

const INVESTMENT_THRESHOLD: Money = Money::from_major(50_000);

/// All eight suggestions, high priority first; ties keep catalog order
pub fn suggest(totals: &BudgetTotals) -> Vec<Suggestion> {
    let expenses = totals.expenses();
    let leftover = totals.leftover();
    let savings_rate = totals.savings_rate();
    let (needs, wants, savings) = totals.recommended_allocation();

    let mut out = vec![
        Suggestion {
            id: "quick-budget-setup",
            title: "Auto-Setup 50/30/20 Budget",
            description: "Automatically allocate your income using the proven 50/30/20 rule",
            priority: if totals.income.is_positive() && expenses.is_zero() {
                Priority::High
            } else {
                Priority::Low
            },
            data: ActionData::Allocation {
                needs,
                wants,
                savings,
            },
        },
        Suggestion {
            id: "add-emergency-fund",
            title: "Create Emergency Fund",
            description: "Set up an emergency fund worth 3-6 months of expenses",
            priority: if totals.savings.is_zero() {
                Priority::High
            } else {
                Priority::Medium
            },
            data: ActionData::EmergencyFund {
                amount: expenses.scale(3.0),
            },
        },
        Suggestion {
            id: "optimize-wants",
            title: "Optimize Wants Spending",
            description: "Review and reduce non-essential expenses to boost savings",
            priority: if totals.wants_percent() > 35.0 {
                Priority::High
            } else {
                Priority::Low
            },
            data: ActionData::WantsReview {
                current: totals.wants,
                recommended: wants,
            },
        },
        Suggestion {
            id: "increase-income",
            title: "Income Boost Calculator",
            description: "Calculate how much extra income you need for your goals",
            priority: if leftover.is_negative() {
                Priority::High
            } else {
                Priority::Medium
            },
            data: ActionData::IncomeGap {
                deficit: leftover.abs(),
                current_income: totals.income,
            },
        },
        Suggestion {
            id: "savings-booster",
            title: "Savings Rate Booster",
            description: "Get personalized tips to increase your savings rate",
            priority: if savings_rate < 20.0 {
                Priority::High
            } else {
                Priority::Medium
            },
            data: ActionData::SavingsRate {
                current_rate: savings_rate,
                target_rate: 20.0,
            },
        },
        Suggestion {
            id: "debt-payoff-plan",
            title: "Debt Payoff Strategy",
            description: "Create an accelerated debt repayment plan",
            priority: Priority::Medium,
            data: ActionData::None,
        },
        Suggestion {
            id: "investment-planner",
            title: "Investment Portfolio Planner",
            description: "Plan your investment allocation based on your savings",
            priority: if totals.savings > INVESTMENT_THRESHOLD {
                Priority::Medium
            } else {
                Priority::Low
            },
            data: ActionData::AvailableSavings {
                amount: totals.savings,
            },
        },
        Suggestion {
            id: "monthly-challenge",
            title: "Start Savings Challenge",
            description: "Begin a 30-day money-saving challenge",
            priority: Priority::Medium,
            data: ActionData::None,
        },
    ];

    // stable
    out.sort_by_key(|s| s.priority);
    out
}
