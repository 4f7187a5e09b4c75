//! Aggregate health scoring.
//!
//! Starts at 100 and applies ordered deductions from the already-derived
//! signals. Pure: identical (commits, config) input always yields the same
//! score and the same deduction list, with no wall-clock involvement.

use serde::{Deserialize, Serialize};
use vitals_core::{Commit, VitalsConfig, WorkSchedule};

use crate::churn::ChurnReport;
use crate::rework::ReworkReport;
use crate::worktime;

/// Points deducted per large commit.
const LARGE_COMMIT_PENALTY: f64 = 5.0;
/// Points deducted per late-night commit.
const LATE_NIGHT_PENALTY: f64 = 2.0;
/// Points deducted per weekend commit.
const WEEKEND_PENALTY: f64 = 1.0;
/// Full penalty when the churn rate reaches the danger edge.
const CHURN_PENALTY_MAX: f64 = 20.0;
/// Full penalty when the rework ratio reaches the danger edge.
const REWORK_PENALTY_MAX: f64 = 15.0;

/// Health tier, cut from the score by configured cutoffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    /// Score at or above the excellent cutoff.
    Excellent,
    /// Score at or above the good cutoff.
    Good,
    /// Score at or above the warning cutoff.
    Warning,
    /// Everything below.
    Danger,
}

/// One applied deduction with its human-readable reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deduction {
    /// What was penalized.
    pub reason: String,
    /// Points removed, positive.
    pub amount: f64,
}

/// The aggregate 0-100 health score with its deduction breakdown.
///
/// # Examples
///
/// ```
/// use vitals_analytics::health::{HealthScore, Tier};
///
/// let score = HealthScore { value: 100.0, tier: Tier::Excellent, deductions: vec![] };
/// assert!(score.value >= 0.0 && score.value <= 100.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScore {
    /// Final score, clamped to `[0, 100]`.
    pub value: f64,
    /// Tier the score falls into.
    pub tier: Tier,
    /// Ordered list of applied deductions.
    pub deductions: Vec<Deduction>,
}

/// Compute the health score from the derived signals.
///
/// Deductions, in order: 5 points per large commit (net added lines at or
/// above `large_commit`), 2 per late-night commit, 1 per weekend commit,
/// then a linear band penalty each for churn rate and rework ratio. The
/// late-night and weekend counts are independent predicates, so a Saturday
/// midnight commit incurs both.
///
/// An empty commit list yields 100 with no deductions.
///
/// # Examples
///
/// ```
/// use vitals_core::VitalsConfig;
/// use vitals_analytics::{churn, health, rework};
///
/// let config = VitalsConfig::default();
/// let schedule = config.working_hours.resolve().unwrap();
/// let churn = churn::analyze(&[], &config);
/// let rework = rework::analyze(&[], &config);
/// let score = health::score(&[], &churn, &rework, &schedule, &config);
/// assert_eq!(score.value, 100.0);
/// assert!(score.deductions.is_empty());
/// ```
pub fn score(
    commits: &[Commit],
    churn: &ChurnReport,
    rework: &ReworkReport,
    schedule: &WorkSchedule,
    config: &VitalsConfig,
) -> HealthScore {
    let mut value = 100.0;
    let mut deductions = Vec::new();

    let large_threshold = config.thresholds.large_commit as i64;
    let large = commits.iter().filter(|c| c.net() >= large_threshold).count();
    if large > 0 {
        let amount = large as f64 * LARGE_COMMIT_PENALTY;
        value -= amount;
        deductions.push(Deduction {
            reason: format!("{large} large commit(s)"),
            amount,
        });
    }

    let late_night = commits
        .iter()
        .filter(|c| worktime::is_late_night(c.timestamp, schedule))
        .count();
    if late_night > 0 {
        let amount = late_night as f64 * LATE_NIGHT_PENALTY;
        value -= amount;
        deductions.push(Deduction {
            reason: format!("{late_night} late-night commit(s)"),
            amount,
        });
    }

    let weekend = commits
        .iter()
        .filter(|c| worktime::is_weekend(c.timestamp, schedule))
        .count();
    if weekend > 0 {
        let amount = weekend as f64 * WEEKEND_PENALTY;
        value -= amount;
        deductions.push(Deduction {
            reason: format!("{weekend} weekend commit(s)"),
            amount,
        });
    }

    let churn_penalty = band_penalty(
        churn.churn_rate,
        config.health.churn_rate_warning,
        config.health.churn_rate_danger,
        CHURN_PENALTY_MAX,
    );
    if churn_penalty > 0.0 {
        value -= churn_penalty;
        deductions.push(Deduction {
            reason: format!(
                "churn rate {:.0}% above {:.0}%",
                churn.churn_rate * 100.0,
                config.health.churn_rate_warning * 100.0
            ),
            amount: churn_penalty,
        });
    }

    let rework_penalty = band_penalty(
        rework.rework_ratio,
        config.health.rework_rate_warning,
        config.health.rework_rate_danger,
        REWORK_PENALTY_MAX,
    );
    if rework_penalty > 0.0 {
        value -= rework_penalty;
        deductions.push(Deduction {
            reason: format!(
                "rework ratio {:.0}% above {:.0}%",
                rework.rework_ratio * 100.0,
                config.health.rework_rate_warning * 100.0
            ),
            amount: rework_penalty,
        });
    }

    let value = value.clamp(0.0, 100.0);
    HealthScore {
        value,
        tier: tier_for(value, config),
        deductions,
    }
}

/// Linear penalty between band edges: zero at or below `warning`, `max` at
/// or above `danger`. Monotonic in `rate`.
fn band_penalty(rate: f64, warning: f64, danger: f64, max: f64) -> f64 {
    if rate <= warning {
        0.0
    } else if rate >= danger {
        max
    } else {
        max * (rate - warning) / (danger - warning)
    }
}

fn tier_for(value: f64, config: &VitalsConfig) -> Tier {
    if value >= config.health.score_excellent {
        Tier::Excellent
    } else if value >= config.health.score_good {
        Tier::Good
    } else if value >= config.health.score_warning {
        Tier::Warning
    } else {
        Tier::Danger
    }
}

/// Share of commits with a descriptive message, in `[0, 100]`.
///
/// A message is good when it carries a conventional-commit prefix
/// (`fix:`, `feat(scope):`, ...) or is at least ten characters long.
/// Empty input scores 100.
pub fn message_quality(commits: &[Commit]) -> f64 {
    if commits.is_empty() {
        return 100.0;
    }
    let good = commits
        .iter()
        .filter(|c| is_conventional(&c.message) || c.message.chars().count() >= 10)
        .count();
    good as f64 / commits.len() as f64 * 100.0
}

fn is_conventional(message: &str) -> bool {
    const TYPES: [&str; 8] = [
        "feat", "fix", "refactor", "docs", "test", "chore", "style", "perf",
    ];
    for kind in TYPES {
        if let Some(rest) = message.strip_prefix(kind) {
            if rest.starts_with(':') {
                return true;
            }
            if rest.starts_with('(') {
                if let Some(close) = rest.find(')') {
                    if rest[close + 1..].starts_with(':') {
                        return true;
                    }
                }
            }
        }
    }
    false
}
