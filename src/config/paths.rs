//! Path management for the budget tracker
//!
//! ## Path Resolution Order
//!
//! 1. `FTT_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory for `fifty-thirty-twenty`
//!    (`~/.config/fifty-thirty-twenty` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::BudgetError;
use crate::models::Bucket;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "FTT_DATA_DIR";

/// Manages all paths used by the application
#[derive(Debug, Clone)]
pub struct AppPaths {
    base_dir: PathBuf,
}

impl AppPaths {
    /// Resolve paths from the environment or the platform defaults
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, BudgetError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create AppPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the JSON line-item lists and ledgers
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Persisted app state: flags, session, streak and achievements
    pub fn state_file(&self) -> PathBuf {
        self.base_dir.join("state.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Default location of the relational store
    pub fn remote_database(&self) -> PathBuf {
        self.base_dir.join("remote.db")
    }

    /// Path of the line-item list for one bucket (income.json, needs.json, ...)
    pub fn bucket_file(&self, bucket: Bucket) -> PathBuf {
        self.data_dir().join(format!("{}.json", bucket.as_str()))
    }

    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    pub fn goals_file(&self) -> PathBuf {
        self.data_dir().join("goals.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), BudgetError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BudgetError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| BudgetError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if the application has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, BudgetError> {
    ProjectDirs::from("", "", "fifty-thirty-twenty")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| BudgetError::Config("Could not determine a home directory".into()))
}
