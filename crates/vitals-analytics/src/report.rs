//! The full analysis pipeline and its single structured result.
//!
//! One synchronous pass: validate config, normalize, clip to the reporting
//! window, run every analyzer over the same immutable commit list, score.
//! Nothing here touches the network, the disk, or the wall clock, so the
//! same input always serializes to the same bytes.

use serde::{Deserialize, Serialize};
use vitals_core::{RawCommit, VitalsConfig, VitalsError, Window};

use crate::churn::{self, ChurnReport};
use crate::health::{self, HealthScore};
use crate::hotspots::{self, HotspotRecord};
use crate::normalize::{self, DroppedRecord};
use crate::rankings::{self, ActivityTotals, DeveloperStats, RankKey, RepositoryStats};
use crate::rework::{self, ReworkReport};
use crate::worktime::{self, WorkPattern};

/// The single structured result of one pipeline invocation.
///
/// Downstream collaborators (renderers, notifiers) consume only this; its
/// JSON form uses camelCase keys throughout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsReport {
    /// The reporting period.
    pub window: Window,
    /// Commits analyzed after dedup, validation, and window clipping.
    pub commit_count: usize,
    /// Duplicate cross-branch observations discarded.
    pub duplicates_discarded: usize,
    /// Malformed records dropped during normalization (non-fatal).
    pub dropped_records: Vec<DroppedRecord>,
    /// Whole-period activity totals.
    pub totals: ActivityTotals,
    /// Commit counts per working-hour bucket.
    pub work_pattern: WorkPattern,
    /// Churn analysis.
    pub churn: ChurnReport,
    /// Rework analysis.
    pub rework: ReworkReport,
    /// Hotspot ranking, score descending.
    pub hotspots: Vec<HotspotRecord>,
    /// Developer ranking.
    pub developers: Vec<DeveloperStats>,
    /// Repository ranking.
    pub repositories: Vec<RepositoryStats>,
    /// Share of commits with a descriptive message, 0-100.
    pub message_quality: f64,
    /// The aggregate health score with its deduction breakdown.
    pub health: HealthScore,
}

/// Run the full pipeline over a raw commit stream.
///
/// Commits outside `window` are clipped before analysis; counting never
/// looks back past the window start unless the caller widens the window or
/// supplies the history inside it. A partial upstream fetch is fine — the
/// pipeline operates on whatever subset it receives, including nothing.
///
/// # Errors
///
/// Returns [`VitalsError::Config`] when a threshold or time window is
/// malformed. Malformed individual records are not errors; they surface in
/// [`VitalsReport::dropped_records`].
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use vitals_core::{VitalsConfig, Window};
/// use vitals_analytics::report::generate;
///
/// let window = Window {
///     start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
///     end: NaiveDate::from_ymd_opt(2026, 1, 8).unwrap().and_hms_opt(0, 0, 0).unwrap(),
/// };
/// let report = generate(&[], window, &VitalsConfig::default()).unwrap();
/// assert_eq!(report.health.value, 100.0);
/// assert_eq!(report.commit_count, 0);
/// ```
pub fn generate(
    raw: &[RawCommit],
    window: Window,
    config: &VitalsConfig,
) -> Result<VitalsReport, VitalsError> {
    config.validate()?;
    let schedule = config.working_hours.resolve()?;

    let outcome = normalize::normalize(raw);
    let commits: Vec<_> = outcome
        .commits
        .into_iter()
        .filter(|c| window.contains(c.timestamp))
        .collect();

    let churn = churn::analyze(&commits, config);
    let rework = rework::analyze(&commits, config);
    let hotspots = hotspots::analyze(&commits, config);
    let health = health::score(&commits, &churn, &rework, &schedule, config);

    Ok(VitalsReport {
        window,
        commit_count: commits.len(),
        duplicates_discarded: outcome.duplicates,
        dropped_records: outcome.dropped,
        totals: rankings::totals(&commits, &config.thresholds),
        work_pattern: worktime::summarize(&commits, &schedule),
        developers: rankings::rank_developers(&commits, RankKey::default()),
        repositories: rankings::rank_repositories(&commits, RankKey::default()),
        message_quality: health::message_quality(&commits),
        churn,
        rework,
        hotspots,
        health,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use vitals_core::FileChange;

    fn window() -> Window {
        Window {
            start: NaiveDate::from_ymd_opt(2026, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 1, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    fn raw(id: &str, author: &str, timestamp: &str, files: Vec<(&str, u64, u64)>) -> RawCommit {
        RawCommit {
            id: id.into(),
            author: author.into(),
            email: format!("{author}@example.com"),
            timestamp: timestamp.into(),
            repository: "billing".into(),
            message: "feat: work".into(),
            files: files
                .into_iter()
                .map(|(path, added, deleted)| FileChange {
                    path: path.into(),
                    added,
                    deleted,
                })
                .collect(),
        }
    }

    #[test]
    fn bad_config_fails_before_analysis() {
        let config =
            VitalsConfig::from_toml("[thresholds]\nhotspot_count = 0\n").unwrap();
        let err = generate(&[], window(), &config).unwrap_err();
        assert!(matches!(err, VitalsError::Config(_)));
    }

    #[test]
    fn commits_outside_the_window_are_clipped() {
        let records = vec![
            raw("in", "alice", "2026-01-05 10:00:00", vec![("a.rs", 10, 0)]),
            raw("before", "alice", "2025-12-20 10:00:00", vec![("a.rs", 10, 0)]),
            raw("after", "alice", "2026-02-01 10:00:00", vec![("a.rs", 10, 0)]),
        ];
        let report = generate(&records, window(), &VitalsConfig::default()).unwrap();
        assert_eq!(report.commit_count, 1);
        assert_eq!(report.totals.added, 10);
    }

    #[test]
    fn dropped_and_duplicate_records_are_reported_not_fatal() {
        let records = vec![
            raw("c1", "alice", "2026-01-05 10:00:00", vec![("a.rs", 10, 0)]),
            raw("c1", "alice", "2026-01-05 10:00:00", vec![("a.rs", 10, 0)]),
            raw("c2", "", "2026-01-05 11:00:00", vec![]),
        ];
        let report = generate(&records, window(), &VitalsConfig::default()).unwrap();
        assert_eq!(report.commit_count, 1);
        assert_eq!(report.duplicates_discarded, 1);
        assert_eq!(report.dropped_records.len(), 1);
    }

    #[test]
    fn report_serializes_with_camel_case_keys() {
        let report = generate(&[], window(), &VitalsConfig::default()).unwrap();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"commitCount\""));
        assert!(json.contains("\"workPattern\""));
        assert!(json.contains("\"churnRate\""));
    }
}
