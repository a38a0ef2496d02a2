//! Transaction CLI commands
//!
//! Implements CLI commands for the daily transaction ledger.

use chrono::{Local, NaiveDate, NaiveTime};
use clap::Subcommand;

use super::{parse_money, parse_time};
use crate::display::{format_day_summary, format_transactions, MoneyFormat};
use crate::error::BudgetResult;
use crate::models::{Money, TransactionCategory, TransactionType};
use crate::services::{CreateTransactionInput, TransactionService, UpdateTransactionInput};
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a transaction
    Add {
        /// income or expense
        kind: TransactionType,
        /// Amount, always positive
        #[arg(value_parser = parse_money)]
        amount: Money,
        /// What it was for
        description: String,
        /// Category label, e.g. "Food & Dining" or salary
        #[arg(short, long)]
        category: TransactionCategory,
        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Time (HH:MM, defaults to now)
        #[arg(short, long, value_parser = parse_time)]
        time: Option<NaiveTime>,
    },

    /// Edit a transaction
    Edit {
        /// Transaction ID or prefix
        id: String,
        #[arg(short, long)]
        kind: Option<TransactionType>,
        #[arg(short, long, value_parser = parse_money)]
        amount: Option<Money>,
        #[arg(short = 'm', long)]
        description: Option<String>,
        #[arg(short, long)]
        category: Option<TransactionCategory>,
        #[arg(short, long)]
        date: Option<NaiveDate>,
        #[arg(short, long, value_parser = parse_time)]
        time: Option<NaiveTime>,
    },

    /// Delete a transaction
    #[command(alias = "rm")]
    Remove {
        /// Transaction ID or prefix
        id: String,
    },

    /// List transactions, newest first
    #[command(alias = "ls")]
    List {
        /// Only this date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// One day's transactions with income, expense and balance
    Day {
        /// Date (YYYY-MM-DD, defaults to today)
        date: Option<NaiveDate>,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(storage: &Storage, cmd: TransactionCommands) -> BudgetResult<()> {
    let service = TransactionService::new(storage);
    let fmt = MoneyFormat::from_settings(storage.settings());

    match cmd {
        TransactionCommands::Add {
            kind,
            amount,
            description,
            category,
            date,
            time,
        } => {
            let txn = service.create(CreateTransactionInput {
                kind,
                amount,
                description,
                category,
                date,
                time,
            })?;
            println!("Recorded {} {}", txn.id, txn);
        }
        TransactionCommands::Edit {
            id,
            kind,
            amount,
            description,
            category,
            date,
            time,
        } => {
            let txn = service.update(
                &id,
                UpdateTransactionInput {
                    kind,
                    amount,
                    description,
                    category,
                    date,
                    time,
                },
            )?;
            println!("Updated {} {}", txn.id, txn);
        }
        TransactionCommands::Remove { id } => {
            let txn = service.delete(&id)?;
            println!("Deleted {}: {}", txn.id, txn.description);
        }
        TransactionCommands::List { date, limit } => {
            let mut transactions = match date {
                Some(date) => service.list_for_date(date)?,
                None => service.list()?,
            };
            transactions.truncate(limit);
            print!("{}", format_transactions(&transactions, &fmt));
        }
        TransactionCommands::Day { date } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let transactions = service.list_for_date(date)?;
            let summary = service.day_summary(date)?;
            print!("{}", format_day_summary(date, &transactions, &summary, &fmt));
        }
    }

    Ok(())
}
