//! CLI commands for data export
//!
//! Each format writes to the given path, or to a dated file in the current
//! directory when none is given.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, Utc};
use clap::Subcommand;

use crate::error::{BudgetError, BudgetResult};
use crate::export::{
    default_file_name, export_json, export_transactions_csv, export_yaml, render_report,
    BudgetSnapshot,
};
use crate::services::{BudgetService, TransactionService};
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Line items as a JSON snapshot
    Json {
        /// Output file path
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Line items as a YAML snapshot
    Yaml {
        /// Output file path
        output: Option<PathBuf>,
    },

    /// The transaction ledger as CSV
    Csv {
        /// Output file path
        output: Option<PathBuf>,
    },

    /// A printable HTML report
    Html {
        /// Output file path
        output: Option<PathBuf>,
    },
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> BudgetResult<()> {
    let today = Local::now().date_naive();

    match cmd {
        ExportCommands::Json { output, pretty } => {
            let output = output.unwrap_or_else(|| PathBuf::from(default_file_name(today)));
            let snapshot = BudgetSnapshot::new(BudgetService::new(storage).sheet()?, Utc::now());
            let mut writer = create(&output)?;
            export_json(&snapshot, &mut writer, pretty)?;
            finish(writer, &output)?;
            println!("Budget exported to: {}", output.display());
        }
        ExportCommands::Yaml { output } => {
            let output = output.unwrap_or_else(|| dated(today, "budget-data", "yaml"));
            let snapshot = BudgetSnapshot::new(BudgetService::new(storage).sheet()?, Utc::now());
            let mut writer = create(&output)?;
            export_yaml(&snapshot, &mut writer)?;
            finish(writer, &output)?;
            println!("Budget exported to: {}", output.display());
        }
        ExportCommands::Csv { output } => {
            let output = output.unwrap_or_else(|| dated(today, "transactions", "csv"));
            let transactions = TransactionService::new(storage).list()?;
            let mut writer = create(&output)?;
            let count = export_transactions_csv(&transactions, &mut writer)?;
            finish(writer, &output)?;
            println!("Exported {} transactions to: {}", count, output.display());
        }
        ExportCommands::Html { output } => {
            let output = output.unwrap_or_else(|| dated(today, "budget-report", "html"));
            let settings = storage.settings();
            let html = render_report(
                &BudgetService::new(storage).sheet()?,
                today,
                &settings.currency_symbol,
                settings.digit_grouping,
            );
            let mut writer = create(&output)?;
            writer
                .write_all(html.as_bytes())
                .map_err(|e| export_error(&output, e))?;
            finish(writer, &output)?;
            println!("Report written to: {}", output.display());
        }
    }

    Ok(())
}

fn dated(date: chrono::NaiveDate, stem: &str, extension: &str) -> PathBuf {
    PathBuf::from(format!("{}-{}.{}", stem, date.format("%Y-%m-%d"), extension))
}

fn export_error(path: &Path, e: std::io::Error) -> BudgetError {
    BudgetError::Export(format!("Failed to write {}: {}", path.display(), e))
}

fn create(path: &Path) -> BudgetResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        BudgetError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

fn finish(mut writer: BufWriter<File>, path: &Path) -> BudgetResult<()> {
    writer.flush().map_err(|e| export_error(path, e))
}
