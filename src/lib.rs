//! fifty-thirty-twenty - Terminal 50/30/20 budgeting
//!
//! This library provides the core functionality of the `ftt` budgeting
//! application. Income is split against the 50/30/20 rule (needs, wants,
//! savings), and every view is derived from the stored line items: totals,
//! compliance, a financial health score, a daily streak and achievements.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types and user-facing messages
//! - `models`: Core data models (line items, transactions, goals, app state)
//! - `analysis`: Aggregates, health score, streak, achievements, suggestions
//! - `storage`: Local JSON files and the relational store for accounts
//! - `auth`: Form validation and the authentication provider
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `export`: JSON, YAML, CSV and HTML export
//! - `display`: Terminal formatting
//! - `cli`: Command definitions and handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use fifty_thirty_twenty::config::paths::AppPaths;
//! use fifty_thirty_twenty::services::BudgetService;
//! use fifty_thirty_twenty::storage::Storage;
//!
//! let storage = Storage::new(AppPaths::new()?)?;
//! let totals = BudgetService::new(&storage).totals()?;
//! println!("compliance: {:.1}%", totals.compliance());
//! ```

pub mod analysis;
pub mod audit;
pub mod auth;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

use std::sync::Once;

pub use error::{BudgetError, BudgetResult};

/// Environment variable holding a tracing filter, e.g. `fifty_thirty_twenty=debug`
pub const LOG_ENV: &str = "FTT_LOG";

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber, writing to stderr
///
/// `FTT_LOG` wins when set; otherwise only warnings are shown, or info with
/// `verbose`.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let default = if verbose {
            "fifty_thirty_twenty=info"
        } else {
            "fifty_thirty_twenty=warn"
        };
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

        // a subscriber installed by the host wins
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
