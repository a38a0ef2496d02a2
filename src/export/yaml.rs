//! YAML snapshot export

use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::export::json::BudgetSnapshot;

fn export_err(e: impl std::fmt::Display) -> BudgetError {
    BudgetError::Export(e.to_string())
}

/// Write the snapshot as YAML under a short comment header
pub fn export_yaml<W: Write>(snapshot: &BudgetSnapshot, writer: &mut W) -> BudgetResult<()> {
    writeln!(writer, "# 50/30/20 budget export").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", snapshot.timestamp).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", snapshot.app_version).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, snapshot).map_err(export_err)?;
    Ok(())
}
