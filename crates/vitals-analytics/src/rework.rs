//! Rework estimation: lines written and then deleted shortly after.
//!
//! Distinct from churn — a file can be committed many times without any
//! line being undone, and a single pair of commits can rework hundreds of
//! lines. Per file, additions enter a FIFO queue of pending entries; a
//! later deletion within `rework_delete_days` of a still-unexpired entry
//! consumes it oldest-first, line for line. The queue is the only mutable
//! state in the engine and lives strictly inside one call.

use std::collections::{HashMap, VecDeque};

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use vitals_core::{Commit, VitalsConfig};

use crate::churn::RiskLevel;

/// Per-file rework metrics.
///
/// # Examples
///
/// ```
/// use vitals_analytics::rework::ReworkRecord;
///
/// let record = ReworkRecord {
///     file: "src/parser.rs".into(),
///     repository: "billing".into(),
///     added_lines: 100,
///     reworked_lines: 40,
///     rework_ratio: 0.4,
/// };
/// assert!(record.rework_ratio <= 1.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReworkRecord {
    /// File path relative to its repository root.
    pub file: String,
    /// Repository the file belongs to. Same-named paths in different
    /// repositories are different files and never match each other.
    pub repository: String,
    /// Lines added to the file within the period.
    pub added_lines: u64,
    /// Added lines deleted again within the rework windows.
    pub reworked_lines: u64,
    /// `reworked_lines / added_lines`, zero when nothing was added.
    pub rework_ratio: f64,
}

/// Per-developer rework attribution.
///
/// Reworked lines are charged to the author of the consumed addition, the
/// developer whose work was undone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRework {
    /// Developer name.
    pub author: String,
    /// Lines this developer added within the period.
    pub added_lines: u64,
    /// Of those, lines deleted again within the rework windows.
    pub reworked_lines: u64,
    /// `reworked_lines / added_lines`, zero when nothing was added.
    pub rework_ratio: f64,
}

/// Rework analysis over a reporting period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReworkReport {
    /// Per-file records, sorted by reworked lines descending then path.
    pub records: Vec<ReworkRecord>,
    /// Per-developer attribution, sorted the same way.
    pub by_author: Vec<AuthorRework>,
    /// Total lines added across all files.
    pub total_added: u64,
    /// Total reworked lines across all files.
    pub total_reworked: u64,
    /// `total_reworked / total_added`, zero when nothing was added.
    pub rework_ratio: f64,
    /// Banding of the aggregate ratio.
    pub level: RiskLevel,
}

struct Pending {
    created: NaiveDateTime,
    author: String,
    remaining: u64,
}

/// Estimate reworked lines in a commit list.
///
/// Expects commits in chronological order (the normalizer's output). An
/// addition entry expires `rework_add_days` after creation; deletions match
/// entries no older than `rework_delete_days`, oldest first, consuming
/// `min(deleted, remaining)` from each.
///
/// # Examples
///
/// ```
/// use vitals_core::VitalsConfig;
/// use vitals_analytics::rework::analyze;
///
/// let report = analyze(&[], &VitalsConfig::default());
/// assert_eq!(report.rework_ratio, 0.0);
/// ```
pub fn analyze(commits: &[Commit], config: &VitalsConfig) -> ReworkReport {
    let add_horizon = Duration::days(config.thresholds.rework_add_days);
    let delete_horizon = Duration::days(config.thresholds.rework_delete_days);

    // files are identified by (repository, path): the same path in two
    // repositories must never match across
    let mut queues: HashMap<(String, String), VecDeque<Pending>> = HashMap::new();
    let mut file_added: HashMap<(String, String), u64> = HashMap::new();
    let mut file_reworked: HashMap<(String, String), u64> = HashMap::new();
    let mut author_added: HashMap<String, u64> = HashMap::new();
    let mut author_reworked: HashMap<String, u64> = HashMap::new();

    for commit in commits {
        for file in &commit.files {
            let key = (commit.repository.clone(), file.path.clone());
            if file.deleted > 0 {
                let queue = queues.entry(key.clone()).or_default();
                // expired entries sit at the front; age only grows
                while queue
                    .front()
                    .is_some_and(|p| commit.timestamp - p.created >= add_horizon)
                {
                    queue.pop_front();
                }

                let mut to_match = file.deleted;
                for pending in queue.iter_mut() {
                    if to_match == 0 {
                        break;
                    }
                    if commit.timestamp - pending.created > delete_horizon {
                        // too old for this deletion, and every later
                        // deletion only sees it older
                        continue;
                    }
                    let consumed = to_match.min(pending.remaining);
                    pending.remaining -= consumed;
                    to_match -= consumed;
                    *file_reworked.entry(key.clone()).or_default() += consumed;
                    *author_reworked.entry(pending.author.clone()).or_default() += consumed;
                }
                queue.retain(|p| p.remaining > 0);
            }

            if file.added > 0 {
                *file_added.entry(key.clone()).or_default() += file.added;
                *author_added.entry(commit.author.clone()).or_default() += file.added;
                queues.entry(key).or_default().push_back(Pending {
                    created: commit.timestamp,
                    author: commit.author.clone(),
                    remaining: file.added,
                });
            }
        }
    }

    let mut records: Vec<ReworkRecord> = file_added
        .iter()
        .map(|(key, &added)| {
            let reworked = file_reworked.get(key).copied().unwrap_or(0);
            let (repository, file) = key;
            ReworkRecord {
                file: file.clone(),
                repository: repository.clone(),
                added_lines: added,
                reworked_lines: reworked,
                rework_ratio: ratio(reworked, added),
            }
        })
        .collect();
    records.sort_by(|a, b| {
        b.reworked_lines
            .cmp(&a.reworked_lines)
            .then(a.file.cmp(&b.file))
            .then(a.repository.cmp(&b.repository))
    });

    let mut by_author: Vec<AuthorRework> = author_added
        .iter()
        .map(|(author, &added)| {
            let reworked = author_reworked.get(author).copied().unwrap_or(0);
            AuthorRework {
                author: author.clone(),
                added_lines: added,
                reworked_lines: reworked,
                rework_ratio: ratio(reworked, added),
            }
        })
        .collect();
    by_author.sort_by(|a, b| {
        b.reworked_lines
            .cmp(&a.reworked_lines)
            .then(a.author.cmp(&b.author))
    });

    let total_added: u64 = file_added.values().sum();
    let total_reworked: u64 = file_reworked.values().sum();
    let rework_ratio = ratio(total_reworked, total_added);

    ReworkReport {
        records,
        by_author,
        total_added,
        total_reworked,
        rework_ratio,
        level: RiskLevel::for_rate(
            rework_ratio,
            config.health.rework_rate_warning,
            config.health.rework_rate_danger,
        ),
    }
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
