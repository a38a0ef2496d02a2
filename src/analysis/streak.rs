//! Daily budget streak
//!
//! A good day is compliance of at least 80 with no deficit. Each calendar day
//! is recorded at most once.

use chrono::NaiveDate;

use super::aggregate::BudgetTotals;
use crate::models::StreakState;

pub const GOOD_DAY_COMPLIANCE: f64 = 80.0;

pub fn is_good_day(totals: &BudgetTotals) -> bool {
    totals.compliance() >= GOOD_DAY_COMPLIANCE && !totals.leftover().is_negative()
}

/// What a check-in did to the streak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckIn {
    Extended { current: u32 },
    Reset,
    AlreadyRecorded,
}

/// Record today's outcome on the streak
pub fn check_in(streak: &mut StreakState, totals: &BudgetTotals, today: NaiveDate) -> CheckIn {
    let good = is_good_day(totals);
    if !streak.record(today, good) {
        return CheckIn::AlreadyRecorded;
    }

    if good {
        CheckIn::Extended {
            current: streak.current,
        }
    } else {
        CheckIn::Reset
    }
}

pub fn message(current: u32) -> &'static str {
    match current {
        0 => "Start your streak today!",
        1 => "Great start! Keep it going!",
        2..=6 => "Building momentum!",
        7..=29 => "You're on fire!",
        _ => "Legendary streak!",
    }
}

/// A named streak target still ahead of the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Milestone {
    pub name: &'static str,
    pub days_remaining: u32,
}

pub fn next_milestone(current: u32) -> Option<Milestone> {
    match current {
        0..=6 => Some(Milestone {
            name: "Weekly Warrior",
            days_remaining: 7 - current,
        }),
        7..=29 => Some(Milestone {
            name: "Monthly Master",
            days_remaining: 30 - current,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    fn totals(income: i64, needs: i64, wants: i64, savings: i64) -> BudgetTotals {
        BudgetTotals::new(
            Money::from_major(income),
            Money::from_major(needs),
            Money::from_major(wants),
            Money::from_major(savings),
        )
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    #[test]
    fn test_good_day_increments_by_one() {
        // compliance 95, leftover positive
        let t = totals(10000, 5500, 2500, 1500);
        assert!(t.compliance() >= 80.0);
        assert!(t.leftover().is_positive());

        let mut streak = StreakState::default();
        assert_eq!(check_in(&mut streak, &t, day(1)), CheckIn::Extended { current: 1 });
        assert_eq!(streak.history, vec![true]);
    }

    #[test]
    fn test_second_check_in_same_day() {
        let t = totals(10000, 5000, 3000, 2000);
        let mut streak = StreakState::default();
        check_in(&mut streak, &t, day(1));
        assert_eq!(check_in(&mut streak, &t, day(1)), CheckIn::AlreadyRecorded);
        assert_eq!(streak.current, 1);
    }

    #[test]
    fn test_deficit_is_bad_day() {
        let t = totals(10000, 5000, 3000, 2500);
        assert!(!is_good_day(&t));

        let mut streak = StreakState {
            current: 4,
            longest: 4,
            ..Default::default()
        };
        assert_eq!(check_in(&mut streak, &t, day(2)), CheckIn::Reset);
        assert_eq!(streak.current, 0);
        assert_eq!(streak.longest, 4);
    }

    #[test]
    fn test_zero_income_is_bad_day() {
        assert!(!is_good_day(&totals(0, 0, 0, 0)));
    }

    #[test]
    fn test_messages() {
        assert_eq!(message(0), "Start your streak today!");
        assert_eq!(message(1), "Great start! Keep it going!");
        assert_eq!(message(6), "Building momentum!");
        assert_eq!(message(7), "You're on fire!");
        assert_eq!(message(30), "Legendary streak!");
    }

    #[test]
    fn test_milestones() {
        assert_eq!(
            next_milestone(3),
            Some(Milestone {
                name: "Weekly Warrior",
                days_remaining: 4
            })
        );
        assert_eq!(next_milestone(7).map(|m| m.days_remaining), Some(23));
        assert_eq!(next_milestone(30), None);
    }
}
