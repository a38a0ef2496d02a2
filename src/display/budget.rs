//! Line items, the 50/30/20 summary, health and suggestions

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::{format_bar, format_percentage, separator, truncate, MoneyFormat};
use crate::analysis::health::{HealthReport, InsightTone};
use crate::analysis::suggestions::{ActionData, Suggestion};
use crate::analysis::BudgetTotals;
use crate::models::{BudgetSheet, Bucket};

#[derive(Tabled)]
struct IncomeRow {
    #[tabled(rename = "#")]
    position: String,
    #[tabled(rename = "Subcategory")]
    label: String,
    #[tabled(rename = "Payday")]
    payday: String,
    #[tabled(rename = "Budget")]
    budget: String,
    #[tabled(rename = "Actual")]
    actual: String,
}

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "#")]
    position: String,
    #[tabled(rename = "Category")]
    label: String,
    #[tabled(rename = "Budget")]
    budget: String,
    #[tabled(rename = "Actual")]
    actual: String,
}

/// One bucket's lines as a numbered table with a total row
pub fn format_bucket(sheet: &BudgetSheet, bucket: Bucket, fmt: &MoneyFormat) -> String {
    let mut table = match sheet.expenses(bucket) {
        Some(items) => {
            let mut rows: Vec<ExpenseRow> = items
                .iter()
                .enumerate()
                .map(|(i, item)| ExpenseRow {
                    position: (i + 1).to_string(),
                    label: truncate(&item.category, 32),
                    budget: fmt.format(item.budget),
                    actual: fmt.format(item.actual),
                })
                .collect();
            rows.push(ExpenseRow {
                position: String::new(),
                label: "TOTAL".into(),
                budget: fmt.format(items.iter().map(|i| i.budget).sum()),
                actual: fmt.format(items.iter().map(|i| i.actual).sum()),
            });
            Table::new(rows)
        }
        None => {
            let mut rows: Vec<IncomeRow> = sheet
                .income
                .iter()
                .enumerate()
                .map(|(i, item)| IncomeRow {
                    position: (i + 1).to_string(),
                    label: truncate(&item.subcategory, 32),
                    payday: item.payday.format("%Y-%m-%d").to_string(),
                    budget: fmt.format(item.budget),
                    actual: fmt.format(item.actual),
                })
                .collect();
            rows.push(IncomeRow {
                position: String::new(),
                label: "TOTAL".into(),
                payday: String::new(),
                budget: fmt.format(sheet.income.iter().map(|i| i.budget).sum()),
                actual: fmt.format(sheet.income.iter().map(|i| i.actual).sum()),
            });
            Table::new(rows)
        }
    };
    table.with(Style::rounded());
    table.with(Modify::new(Columns::new(2..)).with(Alignment::right()));

    let heading = match bucket.target_ratio() {
        Some(ratio) => format!("{} (target {:.0}%)", title(bucket), ratio * 100.0),
        None => title(bucket).to_string(),
    };
    format!("{}\n{}\n", heading, table)
}

fn title(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::Income => "Income",
        Bucket::Needs => "Needs",
        Bucket::Wants => "Wants",
        Bucket::Savings => "Savings",
    }
}

/// Totals, shares of income against the targets, leftover and compliance
pub fn format_summary(totals: &BudgetTotals, fmt: &MoneyFormat) -> String {
    let mut output = String::new();
    output.push_str("50/30/20 Summary\n");
    output.push_str(&separator(56));
    output.push('\n');
    output.push_str(&format!("{:<16}{:>20}\n", "Total income", fmt.format(totals.income)));

    for (bucket, amount, percent) in [
        (Bucket::Needs, totals.needs, totals.needs_percent()),
        (Bucket::Wants, totals.wants, totals.wants_percent()),
        (Bucket::Savings, totals.savings, totals.savings_percent()),
    ] {
        let target = bucket.target_ratio().unwrap_or_default() * 100.0;
        output.push_str(&format!(
            "{:<16}{:>20}  {} {:>5} / {:.0}%\n",
            title(bucket),
            fmt.format(amount),
            format_bar(percent, 100.0, 10),
            format_percentage(percent),
            target
        ));
    }

    output.push_str(&format!("{:<16}{:>20}\n", "Total expenses", fmt.format(totals.expenses())));
    output.push_str(&separator(56));
    output.push('\n');
    output.push_str(&format!(
        "{:<16}{:>20}\n",
        totals.balance_label(),
        fmt.format(totals.leftover())
    ));
    output.push_str(&format!(
        "{:<16}{:>20}\n",
        "Compliance",
        format_percentage(totals.compliance())
    ));
    output.push_str(&format!(
        "{:<16}{:>20}\n",
        "Savings rate",
        format_percentage(totals.savings_rate())
    ));

    let (needs, wants, savings) = totals.recommended_allocation();
    if totals.income.is_positive() {
        output.push_str(&format!(
            "\nRecommended: needs {}, wants {}, savings {}\n",
            fmt.format(needs),
            fmt.format(wants),
            fmt.format(savings)
        ));
    }

    output
}

pub fn format_health(report: &HealthReport) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Financial health: {}/100  Grade {}\n",
        report.score, report.grade
    ));
    output.push_str(&format!("{}\n", format_bar(f64::from(report.score), 100.0, 30)));

    let b = &report.breakdown;
    for (name, value) in [
        ("Needs", b.needs),
        ("Wants", b.wants),
        ("Savings", b.savings),
        ("Balance", b.balance),
    ] {
        output.push_str(&format!("  {:<8} {:>5.1}\n", name, value));
    }

    if !report.insights.is_empty() {
        output.push('\n');
        for insight in &report.insights {
            let marker = match insight.tone {
                InsightTone::Positive => "+",
                InsightTone::Warning => "!",
            };
            output.push_str(&format!("  {} {}\n", marker, insight.message));
        }
    }

    output
}

pub fn format_suggestions(suggestions: &[Suggestion], fmt: &MoneyFormat) -> String {
    let mut output = String::new();
    for suggestion in suggestions {
        output.push_str(&format!(
            "[{}] {}\n    {}\n",
            suggestion.priority, suggestion.title, suggestion.description
        ));
        if let Some(detail) = action_detail(&suggestion.data, fmt) {
            output.push_str(&format!("    {}\n", detail));
        }
    }
    output
}

fn action_detail(data: &ActionData, fmt: &MoneyFormat) -> Option<String> {
    let detail = match *data {
        ActionData::Allocation {
            needs,
            wants,
            savings,
        } => format!(
            "Needs {} / Wants {} / Savings {}",
            fmt.format(needs),
            fmt.format(wants),
            fmt.format(savings)
        ),
        ActionData::EmergencyFund { amount } => format!("Target: {}", fmt.format(amount)),
        ActionData::WantsReview {
            current,
            recommended,
        } => format!(
            "Current {} vs recommended {}",
            fmt.format(current),
            fmt.format(recommended)
        ),
        ActionData::IncomeGap {
            deficit,
            current_income,
        } => format!(
            "Deficit {} on income {}",
            fmt.format(deficit),
            fmt.format(current_income)
        ),
        ActionData::SavingsRate {
            current_rate,
            target_rate,
        } => format!(
            "Savings rate {} (target {})",
            format_percentage(current_rate),
            format_percentage(target_rate)
        ),
        ActionData::AvailableSavings { amount } => format!("Available: {}", fmt.format(amount)),
        ActionData::None => return None,
    };
    Some(detail)
}
