//! Budget aggregation and scoring
//!
//! Pure functions over the line-item lists: totals and percentages, budget
//! compliance, the financial health score, achievements, the daily streak
//! and quick-action suggestions. Nothing here touches storage.

pub mod achievements;
pub mod aggregate;
pub mod health;
pub mod streak;
pub mod suggestions;

pub use achievements::{AchievementReport, AchievementStatus, MetricInputs, CATALOG};
pub use aggregate::{percent_of, ratio_of, sum_actual, sum_budget, BudgetTotals};
pub use health::{Grade, HealthReport, Insight, InsightTone};
pub use streak::{CheckIn, Milestone};
pub use suggestions::{ActionData, Priority, Suggestion};
