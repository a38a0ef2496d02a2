//! Persisted application state
//!
//! The small record of flags and counters that survives between runs: guest
//! and onboarding flags, the signed-in session, the streak counters and the
//! ledger of earned achievements.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// Most recent good/bad day flags kept for display
pub const STREAK_HISTORY_LEN: usize = 7;

/// The signed-in user, as remembered between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub user_id: UserId,
    pub email: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreakState {
    pub current: u32,
    pub longest: u32,
    /// Oldest first
    #[serde(default)]
    pub history: Vec<bool>,
    #[serde(default)]
    pub last_update: Option<NaiveDate>,
}

impl StreakState {
    /// Record one day's outcome; returns false when the day was already recorded
    pub fn record(&mut self, day: NaiveDate, good: bool) -> bool {
        if self.last_update == Some(day) {
            return false;
        }

        if good {
            self.current += 1;
            self.longest = self.longest.max(self.current);
        } else {
            self.current = 0;
        }

        self.history.push(good);
        if self.history.len() > STREAK_HISTORY_LEN {
            let excess = self.history.len() - STREAK_HISTORY_LEN;
            self.history.drain(..excess);
        }

        self.last_update = Some(day);
        true
    }
}

/// Achievement id to the moment it was first unlocked
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AchievementLedger(BTreeMap<String, DateTime<Utc>>);

impl AchievementLedger {
    pub fn unlocked_at(&self, id: &str) -> Option<DateTime<Utc>> {
        self.0.get(id).copied()
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    /// Mark as unlocked; an existing timestamp is kept
    pub fn unlock(&mut self, id: &str, at: DateTime<Utc>) -> bool {
        if self.0.contains_key(id) {
            return false;
        }
        self.0.insert(id.to_string(), at);
        true
    }

    pub fn revoke(&mut self, id: &str) -> bool {
        self.0.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub guest_mode: bool,
    #[serde(default)]
    pub onboarding_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionInfo>,
    #[serde(default)]
    pub streak: StreakState,
    #[serde(default)]
    pub achievements: AchievementLedger,
}

impl AppState {
    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }
}
