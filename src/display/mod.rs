//! Display formatting for terminal output
//!
//! Every function here returns a `String`; printing is left to the CLI.

pub mod budget;
pub mod ledger;
pub mod progress;

use crate::config::Settings;
use crate::models::{DigitGrouping, Money};

pub use budget::{format_bucket, format_health, format_suggestions, format_summary};
pub use ledger::{format_audit_entries, format_day_summary, format_goals, format_transactions};
pub use progress::{format_achievements, format_check_in, format_streak};

/// Currency formatting taken from the user's settings
#[derive(Debug, Clone)]
pub struct MoneyFormat {
    pub symbol: String,
    pub grouping: DigitGrouping,
}

impl MoneyFormat {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            symbol: settings.currency_symbol.clone(),
            grouping: settings.digit_grouping,
        }
    }

    pub fn format(&self, amount: Money) -> String {
        amount.format_with(&self.symbol, self.grouping)
    }
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct.abs() < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// A bar of `width` cells, filled in proportion to `value / max_value`
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return "░".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Truncate to `max_len` characters with an ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(5.24), "5.2%");
        assert_eq!(format_percentage(50.0), "50%");
        assert_eq!(format_percentage(-3.0), "-3.0%");
    }

    #[test]
    fn test_format_bar() {
        assert_eq!(format_bar(50.0, 100.0, 10), "█████░░░░░");
        assert_eq!(format_bar(150.0, 100.0, 4), "████");
        assert_eq!(format_bar(0.0, 100.0, 3), "░░░");
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("Groceries", 20), "Groceries");
        assert_eq!(truncate("Bills & Utilities ₹₹₹", 10), "Bills &...");
        assert_eq!(truncate("abcdef", 2), "..");
    }

    #[test]
    fn test_money_format_follows_settings() {
        let mut settings = Settings::default();
        settings.currency_symbol = "$".into();
        settings.digit_grouping = DigitGrouping::Western;

        let fmt = MoneyFormat::from_settings(&settings);
        assert_eq!(fmt.format(Money::from_major(1_234_567)), "$1,234,567.00");
        assert_eq!(MoneyFormat::default().format(Money::from_major(1_234_567)), "₹12,34,567.00");
    }
}
