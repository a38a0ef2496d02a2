//! Transactions, goals and the audit history

use chrono::{DateTime, NaiveDate, Utc};
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::{format_bar, truncate, MoneyFormat};
use crate::audit::AuditEntry;
use crate::models::{DaySummary, Goal, Transaction};

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Transactions as a table, amounts signed by direction
pub fn format_transactions(transactions: &[Transaction], fmt: &MoneyFormat) -> String {
    if transactions.is_empty() {
        return "No transactions recorded.\n".into();
    }

    let rows: Vec<TransactionRow> = transactions
        .iter()
        .map(|t| TransactionRow {
            id: t.id.to_string(),
            date: t.date.format("%Y-%m-%d").to_string(),
            time: t.time.format("%H:%M").to_string(),
            category: t.category.label().to_string(),
            description: truncate(&t.description, 30),
            amount: fmt.format(t.signed_amount()),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.with(Modify::new(Columns::single(5)).with(Alignment::right()));

    format!("{}\n{} transaction(s)\n", table, transactions.len())
}

/// One day's transactions with income, expense and balance totals
pub fn format_day_summary(
    date: NaiveDate,
    transactions: &[Transaction],
    summary: &DaySummary,
    fmt: &MoneyFormat,
) -> String {
    let mut output = format!("{}\n\n", date.format("%A, %d %B %Y"));
    output.push_str(&format_transactions(transactions, fmt));
    output.push('\n');
    output.push_str(&format!("{:<10}{:>20}\n", "Income", fmt.format(summary.income)));
    output.push_str(&format!("{:<10}{:>20}\n", "Expense", fmt.format(summary.expense)));
    output.push_str(&format!("{:<10}{:>20}\n", "Balance", fmt.format(summary.balance())));
    output
}

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Goal")]
    title: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Saved")]
    saved: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Deadline")]
    deadline: String,
}

pub fn format_goals(goals: &[Goal], now: DateTime<Utc>, fmt: &MoneyFormat) -> String {
    if goals.is_empty() {
        return "No goals yet. Add one with `ftt goal add`.\n".into();
    }

    let rows: Vec<GoalRow> = goals
        .iter()
        .map(|g| GoalRow {
            id: g.id.to_string(),
            title: format!("{} ({})", truncate(&g.title, 24), g.category),
            priority: g.priority.to_string(),
            saved: fmt.format(g.current_amount),
            target: fmt.format(g.target_amount),
            progress: format!(
                "{} {:.0}%",
                format_bar(g.progress_percent(), 100.0, 10),
                g.progress_percent()
            ),
            deadline: deadline_text(g, now),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string() + "\n"
}

fn deadline_text(goal: &Goal, now: DateTime<Utc>) -> String {
    let date = goal.deadline.format("%Y-%m-%d");
    if goal.is_complete() {
        return format!("{} (reached)", date);
    }
    if goal.is_overdue(now) {
        return format!("{} (overdue)", date);
    }
    match goal.days_left(now) {
        1 => format!("{} (1 day left)", date),
        d => format!("{} ({} days left)", date, d),
    }
}

pub fn format_audit_entries(entries: &[AuditEntry]) -> String {
    if entries.is_empty() {
        return "No changes recorded yet.\n".into();
    }

    let mut output = String::new();
    for entry in entries {
        output.push_str(&entry.format_human_readable());
        output.push('\n');
    }
    output
}
