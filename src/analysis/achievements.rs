//! Achievement catalog and evaluation
//!
//! Each achievement is bound to one [`Metric`]; the unlock predicate is
//! `value >= threshold`. Earned achievements are recorded in the persisted
//! [`AchievementLedger`], separately from the short-lived "new unlock" flag.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use super::aggregate::BudgetTotals;
use crate::config::AchievementPolicy;
use crate::models::AchievementLedger;

/// How long an unlock counts as new
pub const NEW_UNLOCK_WINDOW_SECS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementCategory {
    Budget,
    Savings,
    Streak,
    Milestone,
}

impl fmt::Display for AchievementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Budget => "budget",
            Self::Savings => "savings",
            Self::Streak => "streak",
            Self::Milestone => "milestone",
        };
        f.pad(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        };
        f.pad(name)
    }
}

/// The figure an achievement is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// 1 once any income is recorded
    HasIncome,
    Compliance,
    SavingsRate,
    CurrentStreak,
    /// Total savings in whole currency units
    TotalSavings,
}

/// Inputs the metrics are read from
#[derive(Debug, Clone, Copy)]
pub struct MetricInputs {
    pub totals: BudgetTotals,
    pub streak: u32,
}

impl Metric {
    pub fn value(&self, inputs: &MetricInputs) -> f64 {
        match self {
            Metric::HasIncome => {
                if inputs.totals.income.is_positive() {
                    1.0
                } else {
                    0.0
                }
            }
            Metric::Compliance => inputs.totals.compliance(),
            Metric::SavingsRate => inputs.totals.savings_rate(),
            Metric::CurrentStreak => f64::from(inputs.streak),
            Metric::TotalSavings => inputs.totals.savings.as_major(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub threshold: f64,
    pub rarity: Rarity,
    pub metric: Metric,
}

pub const CATALOG: [Achievement; 5] = [
    Achievement {
        id: "first-budget",
        title: "Budget Rookie",
        description: "Created your first budget",
        category: AchievementCategory::Budget,
        threshold: 1.0,
        rarity: Rarity::Common,
        metric: Metric::HasIncome,
    },
    Achievement {
        id: "savings-master",
        title: "Savings Master",
        description: "Save 20% or more of your income",
        category: AchievementCategory::Savings,
        threshold: 20.0,
        rarity: Rarity::Rare,
        metric: Metric::SavingsRate,
    },
    Achievement {
        id: "budget-guardian",
        title: "Budget Guardian",
        description: "Maintain 90% budget compliance",
        category: AchievementCategory::Budget,
        threshold: 90.0,
        rarity: Rarity::Epic,
        metric: Metric::Compliance,
    },
    Achievement {
        id: "streak-warrior",
        title: "Streak Warrior",
        description: "Stay on budget for 7 days straight",
        category: AchievementCategory::Streak,
        threshold: 7.0,
        rarity: Rarity::Rare,
        metric: Metric::CurrentStreak,
    },
    Achievement {
        id: "financial-emperor",
        title: "Financial Emperor",
        description: "Save ₹1,00,000 in total",
        category: AchievementCategory::Milestone,
        threshold: 100_000.0,
        rarity: Rarity::Legendary,
        metric: Metric::TotalSavings,
    },
];

/// One catalog entry after evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct AchievementStatus {
    pub achievement: &'static Achievement,
    pub value: f64,
    pub unlocked: bool,
    pub unlocked_at: Option<DateTime<Utc>>,
    /// Unlocked within the last few seconds
    pub newly_unlocked: bool,
}

impl AchievementStatus {
    /// `min(value / threshold * 100, 100)`; 100 once unlocked
    pub fn progress_percent(&self) -> f64 {
        if self.unlocked {
            return 100.0;
        }
        if self.achievement.threshold <= 0.0 {
            return 0.0;
        }
        (self.value / self.achievement.threshold * 100.0).clamp(0.0, 100.0)
    }
}

/// Result of one evaluation pass
#[derive(Debug, Clone, PartialEq)]
pub struct AchievementReport {
    pub statuses: Vec<AchievementStatus>,
    /// Ids unlocked by this pass
    pub unlocked_now: Vec<&'static str>,
    /// Ids removed by this pass (live policy only)
    pub revoked: Vec<&'static str>,
}

impl AchievementReport {
    pub fn unlocked_count(&self) -> usize {
        self.statuses.iter().filter(|s| s.unlocked).count()
    }

    /// Unlocked share of the catalog, in percent
    pub fn overall_progress(&self) -> f64 {
        if self.statuses.is_empty() {
            return 0.0;
        }
        self.unlocked_count() as f64 / self.statuses.len() as f64 * 100.0
    }
}

/// Evaluate the catalog and update the ledger
///
/// Under [`AchievementPolicy::Permanent`] the ledger only grows. Under
/// [`AchievementPolicy::Live`] an achievement whose metric has dropped below
/// its threshold is removed again.
pub fn evaluate(
    ledger: &mut AchievementLedger,
    inputs: &MetricInputs,
    policy: AchievementPolicy,
    now: DateTime<Utc>,
) -> AchievementReport {
    let window = Duration::seconds(NEW_UNLOCK_WINDOW_SECS);
    let mut unlocked_now = Vec::new();
    let mut revoked = Vec::new();

    let statuses = CATALOG
        .iter()
        .map(|achievement| {
            let value = achievement.metric.value(inputs);
            let meets = value >= achievement.threshold;

            if meets {
                if ledger.unlock(achievement.id, now) {
                    unlocked_now.push(achievement.id);
                }
            } else if policy == AchievementPolicy::Live && ledger.revoke(achievement.id) {
                revoked.push(achievement.id);
            }

            let unlocked_at = ledger.unlocked_at(achievement.id);
            let newly_unlocked = unlocked_at
                .map(|at| now >= at && now - at < window)
                .unwrap_or(false);

            AchievementStatus {
                achievement,
                value,
                unlocked: unlocked_at.is_some(),
                unlocked_at,
                newly_unlocked,
            }
        })
        .collect();

    AchievementReport {
        statuses,
        unlocked_now,
        revoked,
    }
}

/// Look up a catalog entry by id
pub fn find(id: &str) -> Option<&'static Achievement> {
    CATALOG.iter().find(|a| a.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    fn inputs(income: i64, needs: i64, wants: i64, savings: i64, streak: u32) -> MetricInputs {
        MetricInputs {
            totals: BudgetTotals::new(
                Money::from_major(income),
                Money::from_major(needs),
                Money::from_major(wants),
                Money::from_major(savings),
            ),
            streak,
        }
    }

    fn status<'a>(report: &'a AchievementReport, id: &str) -> &'a AchievementStatus {
        report
            .statuses
            .iter()
            .find(|s| s.achievement.id == id)
            .unwrap()
    }

    #[test]
    fn test_budget_rookie_tracks_income() {
        let mut ledger = AchievementLedger::default();
        let now = Utc::now();

        let report = evaluate(&mut ledger, &inputs(0, 0, 0, 0, 0), AchievementPolicy::Permanent, now);
        assert!(!status(&report, "first-budget").unlocked);

        let report = evaluate(&mut ledger, &inputs(1, 0, 0, 0, 0), AchievementPolicy::Permanent, now);
        let rookie = status(&report, "first-budget");
        assert!(rookie.unlocked);
        assert!(rookie.newly_unlocked);
        assert_eq!(report.unlocked_now, vec!["first-budget"]);
    }

    #[test]
    fn test_new_unlock_expires() {
        let mut ledger = AchievementLedger::default();
        let t0 = Utc::now();
        evaluate(&mut ledger, &inputs(100, 0, 0, 0, 0), AchievementPolicy::Permanent, t0);

        let later = t0 + Duration::seconds(NEW_UNLOCK_WINDOW_SECS);
        let report = evaluate(&mut ledger, &inputs(100, 0, 0, 0, 0), AchievementPolicy::Permanent, later);
        let rookie = status(&report, "first-budget");
        assert!(rookie.unlocked);
        assert!(!rookie.newly_unlocked);
        assert!(report.unlocked_now.is_empty());
    }

    #[test]
    fn test_permanent_policy_keeps_earned() {
        let mut ledger = AchievementLedger::default();
        let now = Utc::now();
        evaluate(&mut ledger, &inputs(0, 0, 0, 0, 7), AchievementPolicy::Permanent, now);

        let report = evaluate(&mut ledger, &inputs(0, 0, 0, 0, 0), AchievementPolicy::Permanent, now);
        assert!(status(&report, "streak-warrior").unlocked);
        assert!(report.revoked.is_empty());
    }

    #[test]
    fn test_live_policy_revokes() {
        let mut ledger = AchievementLedger::default();
        let now = Utc::now();
        evaluate(&mut ledger, &inputs(0, 0, 0, 0, 7), AchievementPolicy::Live, now);

        let report = evaluate(&mut ledger, &inputs(0, 0, 0, 0, 2), AchievementPolicy::Live, now);
        assert!(!status(&report, "streak-warrior").unlocked);
        assert_eq!(report.revoked, vec!["streak-warrior"]);
        assert!(!ledger.is_unlocked("streak-warrior"));
    }

    #[test]
    fn test_progress_percent_caps() {
        let mut ledger = AchievementLedger::default();
        let report = evaluate(
            &mut ledger,
            &inputs(100000, 50000, 30000, 10000, 3),
            AchievementPolicy::Permanent,
            Utc::now(),
        );

        let savings = status(&report, "savings-master");
        assert!(!savings.unlocked);
        assert!((savings.progress_percent() - 50.0).abs() < 1e-9);

        let emperor = status(&report, "financial-emperor");
        assert!((emperor.progress_percent() - 10.0).abs() < 1e-9);

        assert!((status(&report, "streak-warrior").progress_percent() - 300.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_overall_progress() {
        let mut ledger = AchievementLedger::default();
        let report = evaluate(
            &mut ledger,
            &inputs(100000, 50000, 30000, 20000, 0),
            AchievementPolicy::Permanent,
            Utc::now(),
        );
        // rookie, savings master, guardian
        assert_eq!(report.unlocked_count(), 3);
        assert!((report.overall_progress() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_find() {
        assert_eq!(find("streak-warrior").map(|a| a.threshold), Some(7.0));
        assert!(find("nope").is_none());
    }
}
