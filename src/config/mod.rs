//! Configuration module
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AchievementPolicy, Settings};
