//! Line-item and summary CLI commands
//!
//! The same subcommand set manages each of the four buckets.

use chrono::NaiveDate;
use clap::Subcommand;

use super::parse_money;
use crate::display::{format_bucket, format_health, format_suggestions, format_summary, MoneyFormat};
use crate::error::BudgetResult;
use crate::models::{Bucket, Money};
use crate::services::{BudgetService, LineItemInput};
use crate::storage::Storage;

/// Line-item subcommands, shared by income, needs, wants and savings
#[derive(Subcommand)]
pub enum LineItemCommands {
    /// Append a line
    Add {
        /// Category or subcategory name
        label: String,
        /// Budgeted amount
        #[arg(short, long, value_parser = parse_money)]
        budget: Option<Money>,
        /// Actual amount
        #[arg(short, long, value_parser = parse_money)]
        actual: Option<Money>,
        /// Payday (YYYY-MM-DD, income only; defaults to today)
        #[arg(short, long)]
        payday: Option<NaiveDate>,
    },

    /// Edit a line by position or label
    #[command(alias = "edit")]
    Set {
        /// 1-based position or label
        item: String,
        /// New label
        #[arg(short, long)]
        label: Option<String>,
        #[arg(short, long, value_parser = parse_money)]
        budget: Option<Money>,
        #[arg(short, long, value_parser = parse_money)]
        actual: Option<Money>,
        /// Payday (YYYY-MM-DD, income only)
        #[arg(short, long)]
        payday: Option<NaiveDate>,
    },

    /// Remove a line by position or label
    #[command(alias = "rm")]
    Remove {
        /// 1-based position or label
        item: String,
    },

    /// List the lines with totals
    #[command(alias = "ls")]
    List,
}

/// Handle a line-item command for one bucket
pub fn handle_line_item_command(
    storage: &Storage,
    bucket: Bucket,
    cmd: LineItemCommands,
) -> BudgetResult<()> {
    let service = BudgetService::new(storage);
    let fmt = MoneyFormat::from_settings(storage.settings());

    match cmd {
        LineItemCommands::Add {
            label,
            budget,
            actual,
            payday,
        } => {
            let position = service.add(
                bucket,
                LineItemInput {
                    label: Some(label.clone()),
                    payday,
                    budget,
                    actual,
                },
            )?;
            println!("Added {} line #{}: {}", bucket.as_str(), position, label.trim());
        }
        LineItemCommands::Set {
            item,
            label,
            budget,
            actual,
            payday,
        } => {
            let position = service.update(
                bucket,
                &item,
                LineItemInput {
                    label,
                    payday,
                    budget,
                    actual,
                },
            )?;
            println!("Updated {} line #{}", bucket.as_str(), position);
        }
        LineItemCommands::Remove { item } => {
            let label = service.remove(bucket, &item)?;
            println!("Removed {} line: {}", bucket.as_str(), label);
        }
        LineItemCommands::List => {
            let sheet = service.sheet()?;
            print!("{}", format_bucket(&sheet, bucket, &fmt));
        }
    }

    Ok(())
}

/// Totals, percentages against the targets and compliance
pub fn handle_summary(storage: &Storage) -> BudgetResult<()> {
    let overview = BudgetService::new(storage).overview()?;
    let fmt = MoneyFormat::from_settings(storage.settings());

    print!("{}", format_summary(&overview.totals, &fmt));
    println!();
    println!(
        "Budgeted: income {}, expenses {}",
        fmt.format(overview.budgeted.income),
        fmt.format(overview.budgeted.expenses())
    );
    println!(
        "Health score: {}/100 ({})",
        overview.health.score, overview.health.grade
    );
    Ok(())
}

pub fn handle_health(storage: &Storage) -> BudgetResult<()> {
    let overview = BudgetService::new(storage).overview()?;
    print!("{}", format_health(&overview.health));
    Ok(())
}

pub fn handle_suggest(storage: &Storage) -> BudgetResult<()> {
    let suggestions = BudgetService::new(storage).suggestions()?;
    let fmt = MoneyFormat::from_settings(storage.settings());
    print!("{}", format_suggestions(&suggestions, &fmt));
    Ok(())
}

/// Zero every amount; needs `--yes`
pub fn handle_reset(storage: &Storage, yes: bool) -> BudgetResult<()> {
    if !yes {
        println!("This sets every budget and actual amount to zero, keeping the labels.");
        println!("Run 'ftt reset --yes' to confirm.");
        return Ok(());
    }

    BudgetService::new(storage).reset()?;
    println!("All amounts reset to zero.");
    Ok(())
}
