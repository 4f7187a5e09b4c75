//! Hotspot ranking: files where modification frequency, author diversity,
//! and size pile up.
//!
//! The composite score is a weighted sum rather than a normalized blend, so
//! scores are comparable across runs with the same config but not across
//! configs. File size is estimated from the supplied history (cumulative net
//! line delta) because the engine never touches the filesystem.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use vitals_core::{Commit, VitalsConfig};

use crate::churn::peak_within_span;

/// Composite risk metrics for a single file.
///
/// # Examples
///
/// ```
/// use vitals_analytics::hotspots::HotspotRecord;
///
/// let record = HotspotRecord {
///     file: "src/state.rs".into(),
///     repository: "billing".into(),
///     score: 14.2,
///     modification_count: 11,
///     distinct_author_count: 3,
///     estimated_lines: 420,
///     flagged: true,
///     flagged_large: false,
/// };
/// assert!(record.flagged && !record.flagged_large);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotRecord {
    /// File path relative to its repository root.
    pub file: String,
    /// Repository the file belongs to. Same-named paths in different
    /// repositories are scored as different files.
    pub repository: String,
    /// Weighted composite risk score.
    pub score: f64,
    /// Commits touching the file within the period.
    pub modification_count: usize,
    /// Distinct authors touching the file within the period.
    pub distinct_author_count: usize,
    /// File size estimated as the cumulative net line delta, floored at 0.
    pub estimated_lines: u64,
    /// Whether any `hotspot_days` span reached `hotspot_count` commits.
    pub flagged: bool,
    /// Whether the estimated size exceeds `large_file`.
    pub flagged_large: bool,
}

/// Rank files by composite hotspot score.
///
/// `score = w_mod · modification_count + w_auth · distinct_author_count +
/// w_size · ln(max(estimated_lines, 1))`. Output is sorted by score
/// descending, then modification count descending, then path ascending.
///
/// # Examples
///
/// ```
/// use vitals_core::VitalsConfig;
/// use vitals_analytics::hotspots::analyze;
///
/// assert!(analyze(&[], &VitalsConfig::default()).is_empty());
/// ```
pub fn analyze(commits: &[Commit], config: &VitalsConfig) -> Vec<HotspotRecord> {
    // files are identified by (repository, path): the same path in two
    // repositories never merges into one hotspot
    let mut touches: HashMap<(String, String), Vec<chrono::NaiveDateTime>> = HashMap::new();
    let mut authors: HashMap<(String, String), HashSet<&str>> = HashMap::new();
    let mut net_lines: HashMap<(String, String), i64> = HashMap::new();

    for commit in commits {
        for file in &commit.files {
            let key = (commit.repository.clone(), file.path.clone());
            touches.entry(key.clone()).or_default().push(commit.timestamp);
            authors
                .entry(key.clone())
                .or_default()
                .insert(commit.author.as_str());
            let size = net_lines.entry(key).or_default();
            // a file cannot shrink below empty, whatever the deltas say
            *size = (*size + file.net()).max(0);
        }
    }

    let weights = &config.weights;
    let mut records: Vec<HotspotRecord> = touches
        .into_iter()
        .map(|(key, mut times)| {
            times.sort();
            let modification_count = times.len();
            let distinct_author_count = authors.get(&key).map_or(0, |s| s.len());
            let estimated_lines = net_lines.get(&key).copied().unwrap_or(0).max(0) as u64;
            let peak = peak_within_span(&times, config.thresholds.hotspot_days);

            let score = weights.modification * modification_count as f64
                + weights.contributors * distinct_author_count as f64
                + weights.size * (estimated_lines.max(1) as f64).ln();

            let (repository, file) = key;
            HotspotRecord {
                file,
                repository,
                score,
                modification_count,
                distinct_author_count,
                estimated_lines,
                flagged: peak >= config.thresholds.hotspot_count,
                flagged_large: estimated_lines > config.thresholds.large_file,
            }
        })
        .collect();

    records.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.modification_count.cmp(&a.modification_count))
            .then(a.file.cmp(&b.file))
            .then(a.repository.cmp(&b.repository))
    });

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use vitals_core::FileChange;

    fn commit(id: &str, author: &str, day: u32, hour: u32, files: Vec<(&str, u64, u64)>) -> Commit {
        Commit {
            id: id.into(),
            author: author.into(),
            email: format!("{author}@example.com"),
            timestamp: NaiveDate::from_ymd_opt(2026, 1, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            repository: "billing".into(),
            message: "test".into(),
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
    fn busy_file_outscores_quiet_file() {
        let mut commits: Vec<Commit> = (0..8)
            .map(|i| {
                commit(
                    &format!("c{i}"),
                    ["alice", "bob", "carol"][i % 3],
                    5 + (i as u32) / 4,
                    9 + (i as u32) % 4,
                    vec![("busy.rs", 40, 10)],
                )
            })
            .collect();
        commits.push(commit("q1", "dave", 5, 10, vec![("quiet.rs", 5, 0)]));

        let records = analyze(&commits, &VitalsConfig::default());
        assert_eq!(records[0].file, "busy.rs");
        assert_eq!(records[0].modification_count, 8);
        assert_eq!(records[0].distinct_author_count, 3);
        assert!(records[0].score > records[1].score);
    }

    #[test]
    fn flagged_when_peak_reaches_hotspot_count() {
        let config = VitalsConfig::from_toml(
            "[thresholds]\nhotspot_days = 2\nhotspot_count = 3\n",
        )
        .unwrap();
        let commits: Vec<Commit> = (0..3)
            .map(|i| commit(&format!("c{i}"), "alice", 5, 9 + i, vec![("f.rs", 10, 0)]))
            .collect();
        let records = analyze(&commits, &config);
        assert!(records[0].flagged);
    }

    #[test]
    fn large_flag_follows_estimated_size() {
        let config =
            VitalsConfig::from_toml("[thresholds]\nlarge_file = 100\n").unwrap();
        let commits = vec![
            commit("c1", "alice", 5, 9, vec![("big.rs", 150, 0)]),
            commit("c2", "alice", 5, 10, vec![("small.rs", 50, 0)]),
        ];
        let records = analyze(&commits, &config);
        let big = records.iter().find(|r| r.file == "big.rs").unwrap();
        let small = records.iter().find(|r| r.file == "small.rs").unwrap();
        assert!(big.flagged_large);
        assert!(!small.flagged_large);
        assert_eq!(big.estimated_lines, 150);
    }

    #[test]
    fn size_estimate_floors_at_zero() {
        // more deletions than additions: history older than the window
        let commits = vec![commit("c1", "alice", 5, 9, vec![("f.rs", 10, 400)])];
        let records = analyze(&commits, &VitalsConfig::default());
        assert_eq!(records[0].estimated_lines, 0);
        // ln floor keeps the score finite
        assert!(records[0].score.is_finite());
    }

    #[test]
    fn same_path_in_two_repos_is_two_hotspots() {
        let mut a = commit("c1", "alice", 5, 9, vec![("src/main.rs", 50, 0)]);
        let mut b = commit("c2", "bob", 5, 10, vec![("src/main.rs", 50, 0)]);
        a.repository = "billing".into();
        b.repository = "frontend".into();
        let records = analyze(&[a, b], &VitalsConfig::default());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].modification_count, 1);
        assert_eq!(records[0].distinct_author_count, 1);
        let repos: Vec<&str> = records.iter().map(|r| r.repository.as_str()).collect();
        assert_eq!(repos, vec!["billing", "frontend"]);
    }

    #[test]
    fn equal_scores_break_by_path() {
        let commits = vec![
            commit("c1", "alice", 5, 9, vec![("b.rs", 10, 0), ("a.rs", 10, 0)]),
        ];
        let records = analyze(&commits, &VitalsConfig::default());
        assert_eq!(records[0].file, "a.rs");
        assert_eq!(records[1].file, "b.rs");
    }
}
