//! Financial goal model
//!
//! Progress moves only through explicit increments and decrements; nothing
//! ties it to the savings totals.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::GoalId;
use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalCategory {
    Emergency,
    Vacation,
    Investment,
    Purchase,
    #[default]
    Other,
}

impl fmt::Display for GoalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Emergency => "Emergency",
            Self::Vacation => "Vacation",
            Self::Investment => "Investment",
            Self::Purchase => "Purchase",
            Self::Other => "Other",
        };
        f.pad(name)
    }
}

impl FromStr for GoalCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "emergency" => Ok(Self::Emergency),
            "vacation" => Ok(Self::Vacation),
            "investment" => Ok(Self::Investment),
            "purchase" => Ok(Self::Purchase),
            "other" => Ok(Self::Other),
            other => Err(format!("Unknown goal category: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl fmt::Display for GoalPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        };
        f.pad(name)
    }
}

impl FromStr for GoalPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!("Unknown goal priority: {}", other)),
        }
    }
}

/// A savings goal with a deadline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    pub target_amount: Money,
    pub current_amount: Money,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub category: GoalCategory,
    #[serde(default)]
    pub priority: GoalPriority,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(title: impl Into<String>, target_amount: Money, deadline: NaiveDate) -> Self {
        Self {
            id: GoalId::new(),
            title: title.into(),
            target_amount,
            current_amount: Money::zero(),
            deadline,
            category: GoalCategory::default(),
            priority: GoalPriority::default(),
            created_at: Utc::now(),
        }
    }

    /// Apply a signed progress change, never going below zero
    pub fn adjust_progress(&mut self, delta: Money) {
        let next = self.current_amount + delta;
        self.current_amount = if next.is_negative() { Money::zero() } else { next };
    }

    /// Percent of target reached; may exceed 100
    pub fn progress_percent(&self) -> f64 {
        if self.target_amount.is_positive() {
            self.current_amount.cents() as f64 / self.target_amount.cents() as f64 * 100.0
        } else {
            0.0
        }
    }

    pub fn is_complete(&self) -> bool {
        self.target_amount.is_positive() && self.current_amount >= self.target_amount
    }

    /// Whole days until the deadline (start of day, UTC), rounded up
    pub fn days_left(&self, now: DateTime<Utc>) -> i64 {
        let deadline = self.deadline.and_time(chrono::NaiveTime::MIN).and_utc();
        let seconds = (deadline - now).num_seconds();
        let day = 86_400;
        // ceil for both signs
        if seconds > 0 {
            (seconds + day - 1) / day
        } else {
            seconds / day
        }
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.days_left(now) <= 0
    }

    /// Validate the goal
    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.title.trim().is_empty() {
            return Err(GoalValidationError::MissingTitle);
        }

        if !self.target_amount.is_positive() {
            return Err(GoalValidationError::NonPositiveTarget(self.target_amount));
        }

        if self.current_amount.is_negative() {
            return Err(GoalValidationError::NegativeProgress(self.current_amount));
        }

        Ok(())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} / {})",
            self.title, self.current_amount, self.target_amount
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    MissingTitle,
    NonPositiveTarget(Money),
    NegativeProgress(Money),
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTitle => write!(f, "Goal title is required"),
            Self::NonPositiveTarget(amount) => {
                write!(f, "Goal target must be greater than zero (got {})", amount)
            }
            Self::NegativeProgress(amount) => {
                write!(f, "Goal progress cannot be negative (got {})", amount)
            }
        }
    }
}

impl std::error::Error for GoalValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn goal() -> Goal {
        Goal::new(
            "Emergency fund",
            Money::from_major(10000),
            NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        )
    }

    #[test]
    fn test_defaults() {
        let g = goal();
        assert_eq!(g.category, GoalCategory::Other);
        assert_eq!(g.priority, GoalPriority::Medium);
        assert!(g.current_amount.is_zero());
    }

    #[test]
    fn test_adjust_progress_floors_at_zero() {
        let mut g = goal();
        g.adjust_progress(Money::from_major(2500));
        assert_eq!(g.current_amount, Money::from_major(2500));
        assert!((g.progress_percent() - 25.0).abs() < 1e-9);

        g.adjust_progress(Money::from_major(-4000));
        assert!(g.current_amount.is_zero());
    }

    #[test]
    fn test_completion() {
        let mut g = goal();
        g.adjust_progress(Money::from_major(12000));
        assert!(g.is_complete());
        assert!(g.progress_percent() > 100.0);
    }

    #[test]
    fn test_days_left_rounds_up() {
        let g = goal();
        let now = Utc.with_ymd_and_hms(2025, 6, 28, 18, 0, 0).unwrap();
        assert_eq!(g.days_left(now), 2);
        assert!(!g.is_overdue(now));

        let after = Utc.with_ymd_and_hms(2025, 6, 30, 9, 0, 0).unwrap();
        assert_eq!(g.days_left(after), 0);
        assert!(g.is_overdue(after));

        let long_after = Utc.with_ymd_and_hms(2025, 7, 3, 0, 0, 0).unwrap();
        assert_eq!(g.days_left(long_after), -3);
    }

    #[test]
    fn test_validate() {
        assert!(goal().validate().is_ok());

        let mut untitled = goal();
        untitled.title = String::new();
        assert_eq!(untitled.validate(), Err(GoalValidationError::MissingTitle));

        let mut free = goal();
        free.target_amount = Money::zero();
        assert!(matches!(
            free.validate(),
            Err(GoalValidationError::NonPositiveTarget(_))
        ));
    }

    #[test]
    fn test_priority_ordering() {
        assert!(GoalPriority::High < GoalPriority::Medium);
        assert!(GoalPriority::Medium < GoalPriority::Low);
        assert_eq!("LOW".parse::<GoalPriority>().unwrap(), GoalPriority::Low);
    }
}
