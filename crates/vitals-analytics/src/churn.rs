//! Churn detection: files modified too often within a short span.
//!
//! A file is churning when any `churn_days`-day span inside the reporting
//! period holds at least `churn_count` commits to it. Counting is bounded by
//! the supplied period; callers wanting a trailing look-back must supply the
//! extra historical commits themselves.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use vitals_core::{Commit, VitalsConfig};

/// Per-file churn metrics.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use vitals_analytics::churn::ChurnRecord;
///
/// let record = ChurnRecord {
///     file: "src/billing.rs".into(),
///     repository: "billing".into(),
///     modification_count: 6,
///     flagged: true,
///     last_modified: NaiveDate::from_ymd_opt(2026, 1, 5)
///         .unwrap()
///         .and_hms_opt(15, 0, 0)
///         .unwrap(),
/// };
/// assert!(record.flagged);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChurnRecord {
    /// File path relative to its repository root.
    pub file: String,
    /// Repository the file belongs to.
    pub repository: String,
    /// Commits touching the file within the period.
    pub modification_count: usize,
    /// Whether any `churn_days` span reached `churn_count` commits.
    pub flagged: bool,
    /// Most recent modification time within the period.
    pub last_modified: NaiveDateTime,
}

/// Coarse risk banding used in summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RiskLevel {
    /// Below the warning band.
    Low,
    /// Between warning and danger.
    Medium,
    /// At or above danger.
    High,
}

impl RiskLevel {
    /// Band a rate against warning/danger edges.
    pub fn for_rate(rate: f64, warning: f64, danger: f64) -> Self {
        if rate >= danger {
            Self::High
        } else if rate > warning {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Churn analysis over a reporting period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChurnReport {
    /// Per-file records, flagged or not, deterministically sorted.
    pub records: Vec<ChurnRecord>,
    /// Flagged files / distinct files touched, in `[0, 1]`. Zero when no
    /// files were touched.
    pub churn_rate: f64,
    /// Number of flagged files.
    pub flagged_files: usize,
    /// Distinct files touched in the period.
    pub distinct_files: usize,
    /// Banding of the churn rate.
    pub level: RiskLevel,
}

/// Detect churning files in a commit list.
///
/// Records are sorted by modification count descending, most recent
/// modification descending, then path ascending, so equal counts rank
/// deterministically.
///
/// # Examples
///
/// ```
/// use vitals_core::VitalsConfig;
/// use vitals_analytics::churn::analyze;
///
/// let report = analyze(&[], &VitalsConfig::default());
/// assert_eq!(report.churn_rate, 0.0);
/// assert!(report.records.is_empty());
/// ```
pub fn analyze(commits: &[Commit], config: &VitalsConfig) -> ChurnReport {
    // (repository, path) -> commit timestamps, already in ascending order
    // because the normalizer sorts its output.
    let mut touches: HashMap<(String, String), Vec<NaiveDateTime>> = HashMap::new();
    for commit in commits {
        for file in &commit.files {
            touches
                .entry((commit.repository.clone(), file.path.clone()))
                .or_default()
                .push(commit.timestamp);
        }
    }

    let distinct_files = touches.len();
    let mut records: Vec<ChurnRecord> = touches
        .into_iter()
        .map(|((repository, file), mut times)| {
            times.sort();
            let peak = peak_within_span(&times, config.thresholds.churn_days);
            ChurnRecord {
                file,
                repository,
                modification_count: times.len(),
                flagged: peak >= config.thresholds.churn_count,
                last_modified: *times.last().expect("touched file has a timestamp"),
            }
        })
        .collect();

    records.sort_by(|a, b| {
        b.modification_count
            .cmp(&a.modification_count)
            .then(b.last_modified.cmp(&a.last_modified))
            .then(a.file.cmp(&b.file))
            .then(a.repository.cmp(&b.repository))
    });

    let flagged_files = records.iter().filter(|r| r.flagged).count();
    let churn_rate = if distinct_files == 0 {
        0.0
    } else {
        flagged_files as f64 / distinct_files as f64
    };

    ChurnReport {
        records,
        churn_rate,
        flagged_files,
        distinct_files,
        level: RiskLevel::for_rate(
            churn_rate,
            config.health.churn_rate_warning,
            config.health.churn_rate_danger,
        ),
    }
}

/// Largest number of timestamps falling in any `days`-long span.
///
/// Two-pointer sweep over sorted timestamps; span edges are inclusive.
pub(crate) fn peak_within_span(times: &[NaiveDateTime], days: i64) -> usize {
    let span = Duration::days(days);
    let mut best = 0;
    let mut lo = 0;
    for hi in 0..times.len() {
        while times[hi] - times[lo] > span {
            lo += 1;
        }
        best = best.max(hi - lo + 1);
    }
    best
}
