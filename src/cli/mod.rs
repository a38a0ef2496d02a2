//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod auth;
pub mod budget;
pub mod export;
pub mod goal;
pub mod progress;
pub mod setup;
pub mod transaction;

pub use auth::{handle_auth_command, AuthCommands};
pub use budget::{
    handle_health, handle_line_item_command, handle_reset, handle_suggest, handle_summary,
    LineItemCommands,
};
pub use export::{handle_export_command, ExportCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use progress::{handle_achievements, handle_streak};
pub use setup::{handle_config, handle_history, handle_init, handle_onboarding};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::NaiveTime;

use crate::models::Money;

/// Value parser for amounts such as `1200`, `99.5` or `₹1,250.00`
pub fn parse_money(s: &str) -> Result<Money, String> {
    Money::parse(s).map_err(|e| e.to_string())
}

/// Value parser for `HH:MM` or `HH:MM:SS`
pub fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| format!("Invalid time '{}', expected HH:MM", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("₹1,250.50").unwrap(), Money::from_cents(125_050));
        assert!(parse_money("abc").is_err());
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("08:15").unwrap(), NaiveTime::from_hms_opt(8, 15, 0).unwrap());
        assert_eq!(parse_time("23:59:30").unwrap(), NaiveTime::from_hms_opt(23, 59, 30).unwrap());
        assert!(parse_time("25:00").is_err());
    }
}
