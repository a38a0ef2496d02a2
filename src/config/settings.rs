//! User settings
//!
//! Manages display preferences, the achievement policy and the location of
//! the relational store.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::AppPaths;
use crate::error::BudgetError;
use crate::models::DigitGrouping;

/// Whether earned achievements survive a later dip below their threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AchievementPolicy {
    /// Once unlocked, an achievement stays unlocked (default)
    #[default]
    Permanent,
    /// Unlocked state follows the current metric on every evaluation
    Live,
}

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used for display and reports
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Thousands grouping for amounts
    #[serde(default)]
    pub digit_grouping: DigitGrouping,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default)]
    pub achievement_policy: AchievementPolicy,

    /// Override for the relational store location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_database: Option<PathBuf>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "₹".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            digit_grouping: DigitGrouping::default(),
            date_format: default_date_format(),
            achievement_policy: AchievementPolicy::default(),
            remote_database: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &AppPaths) -> Result<Self, BudgetError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                BudgetError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BudgetError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &AppPaths) -> Result<(), BudgetError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            BudgetError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BudgetError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Resolved path of the relational store
    pub fn remote_database_path(&self, paths: &AppPaths) -> PathBuf {
        self.remote_database
            .clone()
            .unwrap_or_else(|| paths.remote_database())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "₹");
        assert_eq!(settings.digit_grouping, DigitGrouping::Indian);
        assert_eq!(settings.achievement_policy, AchievementPolicy::Permanent);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.currency_symbol = "$".into();
        settings.achievement_policy = AchievementPolicy::Live;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "$");
        assert_eq!(loaded.achievement_policy, AchievementPolicy::Live);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol":"€"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "€");
        assert_eq!(settings.date_format, "%Y-%m-%d");
        assert!(settings.remote_database.is_none());
    }

    #[test]
    fn test_remote_database_default_path() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());
        let settings = Settings::default();
        assert_eq!(
            settings.remote_database_path(&paths),
            temp_dir.path().join("remote.db")
        );
    }
}
