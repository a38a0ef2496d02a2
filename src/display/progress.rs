//! Achievements and the daily streak

use super::{format_bar, format_percentage};
use crate::analysis::achievements::AchievementReport;
use crate::analysis::streak::{self, CheckIn};
use crate::models::StreakState;
use crate::services::CheckInOutcome;

pub fn format_achievements(report: &AchievementReport) -> String {
    let mut output = format!(
        "Achievements: {}/{} unlocked ({})\n\n",
        report.unlocked_count(),
        report.statuses.len(),
        format_percentage(report.overall_progress())
    );

    for status in &report.statuses {
        let a = status.achievement;
        let mark = if status.unlocked { "✓" } else { " " };
        let new = if status.newly_unlocked { "  NEW!" } else { "" };
        output.push_str(&format!(
            "[{}] {:<20} {:<10} {}{}\n",
            mark, a.title, a.rarity, a.description, new
        ));

        match status.unlocked_at {
            Some(at) => output.push_str(&format!("    unlocked {}\n", at.format("%Y-%m-%d"))),
            None => output.push_str(&format!(
                "    {} {:.0}%\n",
                format_bar(status.progress_percent(), 100.0, 20),
                status.progress_percent()
            )),
        }
    }

    output
}

/// Current and longest streak, the last seven days, and the next milestone
pub fn format_streak(state: &StreakState) -> String {
    let mut output = format!(
        "Current streak: {} day(s)   Longest: {} day(s)\n{}\n",
        state.current,
        state.longest,
        streak::message(state.current)
    );

    if !state.history.is_empty() {
        let days: String = state
            .history
            .iter()
            .map(|good| if *good { '●' } else { '○' })
            .collect();
        output.push_str(&format!("Last {} day(s): {}\n", state.history.len(), days));
    }

    match streak::next_milestone(state.current) {
        Some(m) => output.push_str(&format!(
            "Next milestone: {} in {} day(s)\n",
            m.name, m.days_remaining
        )),
        None => output.push_str("Every milestone reached.\n"),
    }

    output
}

pub fn format_check_in(outcome: &CheckInOutcome) -> String {
    let mut output = match outcome.check_in {
        CheckIn::Extended { current } => format!("On budget today. Streak is now {} day(s).\n", current),
        CheckIn::Reset => "Off budget today. Streak reset.\n".to_string(),
        CheckIn::AlreadyRecorded => "Today is already recorded.\n".to_string(),
    };
    output.push('\n');
    output.push_str(&format_streak(&outcome.streak));

    for status in outcome
        .achievements
        .statuses
        .iter()
        .filter(|s| outcome.achievements.unlocked_now.contains(&s.achievement.id))
    {
        output.push_str(&format!("\nAchievement unlocked: {}!\n", status.achievement.title));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::achievements::{evaluate, MetricInputs};
    use crate::analysis::BudgetTotals;
    use crate::config::AchievementPolicy;
    use crate::models::{AchievementLedger, Money};
    use chrono::Utc;

    fn report() -> AchievementReport {
        let inputs = MetricInputs {
            totals: BudgetTotals::new(
                Money::from_major(1000),
                Money::from_major(800),
                Money::from_major(300),
                Money::from_major(100),
            ),
            streak: 0,
        };
        evaluate(&mut AchievementLedger::default(), &inputs, AchievementPolicy::Permanent, Utc::now())
    }

    #[test]
    fn test_achievements_list() {
        let text = format_achievements(&report());

        assert!(text.starts_with("Achievements: 1/5 unlocked (20%)"));
        assert!(text.contains("[✓] Budget Rookie"));
        assert!(text.contains("NEW!"));
        // savings at 10% of a 20% threshold
        assert!(text.contains("██████████░░░░░░░░░░ 50%"));
    }

    #[test]
    fn test_streak_milestone() {
        let state = StreakState {
            current: 3,
            longest: 5,
            history: vec![false, true, true, true],
            last_update: None,
        };

        let text = format_streak(&state);
        assert!(text.contains("Building momentum!"));
        assert!(text.contains("○●●●"));
        assert!(text.contains("Weekly Warrior in 4 day(s)"));
    }

    #[test]
    fn test_streak_past_all_milestones() {
        let state = StreakState {
            current: 45,
            longest: 45,
            ..Default::default()
        };
        assert!(format_streak(&state).contains("Every milestone reached."));
    }

    #[test]
    fn test_check_in_announces_unlocks() {
        let outcome = CheckInOutcome {
            check_in: CheckIn::Extended { current: 1 },
            streak: StreakState {
                current: 1,
                longest: 1,
                history: vec![true],
                last_update: None,
            },
            achievements: report(),
        };

        let text = format_check_in(&outcome);
        assert!(text.starts_with("On budget today. Streak is now 1 day(s)."));
        assert!(text.contains("Achievement unlocked: Budget Rookie!"));
    }
}
