//! Streak and achievement progress
//!
//! Both are derived from the current aggregates and recorded in the
//! persisted app state.

use chrono::{DateTime, NaiveDate, Utc};

use crate::analysis::achievements::{self, AchievementReport, MetricInputs};
use crate::analysis::streak::{self, CheckIn};
use crate::analysis::BudgetTotals;
use crate::error::BudgetResult;
use crate::models::StreakState;
use crate::services::BudgetService;
use crate::storage::Storage;

pub struct ProgressService<'a> {
    storage: &'a Storage,
}

/// Result of a daily check-in
#[derive(Debug, Clone)]
pub struct CheckInOutcome {
    pub check_in: CheckIn,
    pub streak: StreakState,
    pub achievements: AchievementReport,
}

impl<'a> ProgressService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn streak(&self) -> BudgetResult<StreakState> {
        Ok(self.storage.state.load()?.streak)
    }

    /// Evaluate the catalog against the current totals and record unlocks
    pub fn achievements(&self, now: DateTime<Utc>) -> BudgetResult<AchievementReport> {
        let totals = BudgetService::new(self.storage).totals()?;
        self.evaluate(&totals, now)
    }

    /// Record today's outcome on the streak, then re-evaluate achievements
    pub fn check_in(&self, today: NaiveDate, now: DateTime<Utc>) -> BudgetResult<CheckInOutcome> {
        let totals = BudgetService::new(self.storage).totals()?;
        let (check_in, streak) = self.storage.state.update(|state| {
            let check_in = streak::check_in(&mut state.streak, &totals, today);
            (check_in, state.streak.clone())
        })?;
        tracing::info!(?check_in, current = streak.current, "streak check-in");

        let achievements = self.evaluate(&totals, now)?;
        Ok(CheckInOutcome {
            check_in,
            streak,
            achievements,
        })
    }

    fn evaluate(&self, totals: &BudgetTotals, now: DateTime<Utc>) -> BudgetResult<AchievementReport> {
        let policy = self.storage.settings().achievement_policy;
        let mut state = self.storage.state.load()?;
        let inputs = MetricInputs {
            totals: *totals,
            streak: state.streak.current,
        };

        let report = achievements::evaluate(&mut state.achievements, &inputs, policy, now);
        if !report.unlocked_now.is_empty() || !report.revoked.is_empty() {
            self.storage.state.save(&state)?;
            for id in &report.unlocked_now {
                tracing::info!(achievement = *id, "achievement unlocked");
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::AppPaths;
    use crate::services::LineItemInput;
    use crate::models::{Bucket, Money};
    use chrono::Duration;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, d).unwrap()
    }

    #[test]
    fn test_first_budget_unlocks_and_persists() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ProgressService::new(&storage);
        let now = Utc::now();

        let report = service.achievements(now).unwrap();
        assert!(report.unlocked_now.contains(&"first-budget"));
        assert!(storage.state.load().unwrap().achievements.is_unlocked("first-budget"));

        // second pass three seconds later: still unlocked, no longer new
        let later = service.achievements(now + Duration::seconds(3)).unwrap();
        assert!(later.unlocked_now.is_empty());
        let status = later
            .statuses
            .iter()
            .find(|s| s.achievement.id == "first-budget")
            .unwrap();
        assert!(status.unlocked);
        assert!(!status.newly_unlocked);
    }

    #[test]
    fn test_check_in_once_per_day() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ProgressService::new(&storage);

        let first = service.check_in(day(10), Utc::now()).unwrap();
        assert_ne!(first.check_in, CheckIn::AlreadyRecorded);

        let again = service.check_in(day(10), Utc::now()).unwrap();
        assert_eq!(again.check_in, CheckIn::AlreadyRecorded);
        assert_eq!(again.streak, first.streak);
    }

    #[test]
    fn test_good_days_extend_streak() {
        let (_temp_dir, storage) = create_test_storage();
        let budget = BudgetService::new(&storage);
        budget.reset().unwrap();
        // income 1000 split exactly 50/30/20
        for (bucket, amount) in [
            (Bucket::Income, 1000),
            (Bucket::Needs, 500),
            (Bucket::Wants, 300),
            (Bucket::Savings, 200),
        ] {
            budget
                .update(
                    bucket,
                    "1",
                    LineItemInput {
                        actual: Some(Money::from_major(amount)),
                        ..Default::default()
                    },
                )
                .unwrap();
        }

        let service = ProgressService::new(&storage);
        for d in 1..=7 {
            service.check_in(day(d), Utc::now()).unwrap();
        }

        let streak = service.streak().unwrap();
        assert_eq!(streak.current, 7);
        assert_eq!(streak.history.len(), 7);
        assert!(storage.state.load().unwrap().achievements.is_unlocked("streak-warrior"));
    }
}
