//! Custom error types for the 50/30/20 budget tracker
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions, plus the mapping from raw failures to the
//! short messages shown to the user.

use thiserror::Error;

/// The main error type for budget operations
#[derive(Error, Debug)]
pub enum BudgetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML serialization errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// CSV writing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Relational store errors
    #[error("Database error: {0}")]
    Database(String),

    /// Validation errors, raised before any store or provider call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Authentication provider rejected the request
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Operation the current front end cannot perform
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

/// Known failure substrings and the message shown for each.
///
/// Matched case-insensitively against the error text, first hit wins.
const KNOWN_FAILURES: &[(&str, &str)] = &[
    (
        "invalid login credentials",
        "Invalid email or password. Please check your credentials.",
    ),
    (
        "already registered",
        "An account with this email already exists. Try signing in instead.",
    ),
    (
        "email not confirmed",
        "Please confirm your email address before signing in.",
    ),
    ("session expired", "Your session has expired. Please sign in again."),
    ("not signed in", "You are not signed in."),
    (
        "database is locked",
        "The budget database is busy. Please try again in a moment.",
    ),
    (
        "network",
        "Could not reach the budget service. Check your connection and try again.",
    ),
];

const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

impl BudgetError {
    /// Create a "not found" error for line items
    pub fn line_item_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Line item",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for goals
    pub fn goal_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Goal",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Human-readable message for the terminal
    ///
    /// Validation and not-found errors already carry a user-facing message.
    /// Everything else is matched against known failure substrings, with a
    /// generic fallback for anything unrecognised.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::NotFound { .. } | Self::Unsupported(_) => self.to_string(),
            other => {
                let text = other.to_string().to_lowercase();
                KNOWN_FAILURES
                    .iter()
                    .find(|(needle, _)| text.contains(needle))
                    .map(|(_, message)| (*message).to_string())
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string())
            }
        }
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for BudgetError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

impl From<csv::Error> for BudgetError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<rusqlite::Error> for BudgetError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Result type alias for budget operations
pub type BudgetResult<T> = Result<T, BudgetError>;
