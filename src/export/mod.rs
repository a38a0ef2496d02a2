//! Export module for the budget tracker
//!
//! - JSON: snapshot of the four line-item lists (the save-file format)
//! - YAML: the same snapshot, human-readable
//! - CSV: the transaction ledger (spreadsheet-compatible)
//! - HTML: printable budget report

pub mod csv;
pub mod html;
pub mod json;
pub mod yaml;

pub use self::csv::export_transactions_csv;
pub use html::render_report;
pub use json::{default_file_name, export_json, BudgetSnapshot, EXPORT_SCHEMA_VERSION};
pub use yaml::export_yaml;
