//! Financial health score
//!
//! A weighted composite of how far each bucket sits from its 50/30/20 target,
//! plus a balance term driven by the sign of the leftover.

use std::fmt;

use super::aggregate::BudgetTotals;

const NEEDS_WEIGHT: f64 = 0.3;
const WANTS_WEIGHT: f64 = 0.2;
const SAVINGS_WEIGHT: f64 = 0.3;
const BALANCE_WEIGHT: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Grade::APlus,
            80..=89 => Grade::A,
            70..=79 => Grade::B,
            60..=69 => Grade::C,
            50..=59 => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Whether an insight praises or warns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightTone {
    Positive,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insight {
    pub tone: InsightTone,
    pub message: &'static str,
}

impl Insight {
    fn positive(message: &'static str) -> Self {
        Self {
            tone: InsightTone::Positive,
            message,
        }
    }

    fn warning(message: &'static str) -> Self {
        Self {
            tone: InsightTone::Warning,
            message,
        }
    }
}

/// Per-term contributions before weighting, each in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthBreakdown {
    pub needs: f64,
    pub wants: f64,
    pub savings: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub score: u8,
    pub grade: Grade,
    pub breakdown: HealthBreakdown,
    pub insights: Vec<Insight>,
}

fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Score a set of totals; zero income scores 0 with no insights
pub fn evaluate(totals: &BudgetTotals) -> HealthReport {
    if !totals.income.is_positive() {
        return HealthReport {
            score: 0,
            grade: Grade::F,
            breakdown: HealthBreakdown {
                needs: 0.0,
                wants: 0.0,
                savings: 0.0,
                balance: 0.0,
            },
            insights: Vec::new(),
        };
    }

    let needs_ratio = totals.needs_ratio();
    let wants_ratio = totals.wants_ratio();
    let savings_ratio = totals.savings_ratio();
    let leftover = totals.leftover();

    let breakdown = HealthBreakdown {
        needs: clamp_score(100.0 - (needs_ratio - 0.5).abs() * 200.0),
        wants: clamp_score(100.0 - (wants_ratio - 0.3).abs() * 333.0),
        savings: clamp_score(100.0 - (savings_ratio - 0.2).abs() * 500.0),
        balance: if leftover.is_negative() {
            let deficit_ratio = leftover.cents() as f64 / totals.income.cents() as f64;
            clamp_score(100.0 + deficit_ratio * 500.0)
        } else {
            100.0
        },
    };

    let weighted = breakdown.needs * NEEDS_WEIGHT
        + breakdown.wants * WANTS_WEIGHT
        + breakdown.savings * SAVINGS_WEIGHT
        + breakdown.balance * BALANCE_WEIGHT;
    let score = clamp_score(weighted.round()) as u8;

    HealthReport {
        score,
        grade: Grade::from_score(score),
        breakdown,
        insights: insights(totals),
    }
}

/// Threshold advisories on each ratio and on the leftover
pub fn insights(totals: &BudgetTotals) -> Vec<Insight> {
    let mut out = Vec::new();
    if !totals.income.is_positive() {
        return out;
    }

    let needs_ratio = totals.needs_ratio();
    if needs_ratio > 0.6 {
        out.push(Insight::warning("Consider reducing essential expenses"));
    } else if needs_ratio < 0.4 {
        out.push(Insight::positive("Great job keeping needs under control!"));
    }

    let wants_ratio = totals.wants_ratio();
    if wants_ratio > 0.4 {
        out.push(Insight::warning("Try to reduce discretionary spending"));
    } else if wants_ratio < 0.2 {
        out.push(Insight::positive("You're very disciplined with wants!"));
    }

    let savings_ratio = totals.savings_ratio();
    if savings_ratio < 0.1 {
        out.push(Insight::warning("Increase your savings rate for better security"));
    } else if savings_ratio > 0.3 {
        out.push(Insight::positive("Excellent savings discipline!"));
    }

    let leftover = totals.leftover();
    if leftover.is_negative() {
        out.push(Insight::warning("You're overspending - time to adjust!"));
    } else if leftover.cents() as f64 > totals.income.cents() as f64 * 0.1 {
        out.push(Insight::positive("Great surplus - consider investing more!"));
    }

    out
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

    #[test]
    fn test_on_target_scores_a_plus() {
        let report = evaluate(&totals(100000, 50000, 30000, 20000));
        assert_eq!(report.score, 100);
        assert_eq!(report.grade, Grade::APlus);
        assert!(report.insights.is_empty());
    }

    #[test]
    fn test_zero_income_scores_zero() {
        let report = evaluate(&totals(0, 900, 100, 5));
        assert_eq!(report.score, 0);
        assert_eq!(report.grade, Grade::F);
        assert!(report.insights.is_empty());
    }

    #[test]
    fn test_score_stays_in_range() {
        let cases = [
            totals(1000, 5000, 5000, 5000),
            totals(1000, 0, 0, 0),
            totals(1, 0, 0, 1_000_000),
            totals(1000, -500, 0, 0),
        ];
        for t in cases {
            let report = evaluate(&t);
            assert!(report.score <= 100);
        }
    }

    #[test]
    fn test_deficit_lowers_balance_term() {
        // 80% needs, 30% wants, 10% savings => leftover -20% => balance 0
        let report = evaluate(&totals(1000, 800, 300, 100));
        assert_eq!(report.breakdown.balance, 0.0);
        assert!((report.breakdown.needs - 40.0).abs() < 1e-9);
        assert!((report.breakdown.savings - 50.0).abs() < 1e-9);
        // 40*0.3 + 100*0.2 + 50*0.3 + 0 = 47
        assert_eq!(report.score, 47);
        assert_eq!(report.grade, Grade::F);
    }

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(Grade::from_score(90), Grade::APlus);
        assert_eq!(Grade::from_score(89), Grade::A);
        assert_eq!(Grade::from_score(70), Grade::B);
        assert_eq!(Grade::from_score(60), Grade::C);
        assert_eq!(Grade::from_score(50), Grade::D);
        assert_eq!(Grade::from_score(49), Grade::F);
    }

    #[test]
    fn test_insight_thresholds() {
        let messages: Vec<&str> = insights(&totals(1000, 700, 450, 50))
            .iter()
            .map(|i| i.message)
            .collect();
        assert_eq!(
            messages,
            vec![
                "Consider reducing essential expenses",
                "Try to reduce discretionary spending",
                "Increase your savings rate for better security",
                "You're overspending - time to adjust!",
            ]
        );

        let frugal = insights(&totals(1000, 300, 100, 400));
        assert!(frugal.iter().all(|i| i.tone == InsightTone::Positive));
        assert_eq!(frugal.len(), 4);
        assert_eq!(frugal[3].message, "Great surplus - consider investing more!");
    }

    #[test]
    fn test_surplus_of_exactly_ten_percent_is_quiet() {
        let out = insights(&totals(1000, 500, 200, 200));
        assert!(!out
            .iter()
            .any(|i| i.message.starts_with("Great surplus")));
    }
}
