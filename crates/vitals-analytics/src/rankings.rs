//! Per-developer and per-repository aggregation and ranking.
//!
//! Totals are computed over the full commit list; top-K truncation is a
//! presentation concern and never feeds back into the numbers.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use vitals_core::{Commit, Thresholds};

/// Aggregated activity for one developer.
///
/// # Examples
///
/// ```
/// use vitals_analytics::rankings::DeveloperStats;
///
/// let stats = DeveloperStats {
///     name: "alice".into(),
///     commit_count: 12,
///     added: 400,
///     deleted: 150,
///     net: 250,
///     files_touched: 9,
///     repositories: vec!["billing".into()],
/// };
/// assert_eq!(stats.net, 250);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperStats {
    /// Canonical developer identity.
    pub name: String,
    /// Commits in the period.
    pub commit_count: usize,
    /// Lines added.
    pub added: u64,
    /// Lines deleted.
    pub deleted: u64,
    /// `added - deleted`, may be negative.
    pub net: i64,
    /// Distinct files touched.
    pub files_touched: usize,
    /// Repositories contributed to, sorted.
    pub repositories: Vec<String>,
}

/// Aggregated activity for one repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryStats {
    /// Repository name.
    pub name: String,
    /// Commits in the period.
    pub commit_count: usize,
    /// Lines added.
    pub added: u64,
    /// Lines deleted.
    pub deleted: u64,
    /// `added - deleted`, may be negative.
    pub net: i64,
    /// Distinct files touched.
    pub files_touched: usize,
    /// Distinct contributing developers.
    pub contributors: usize,
}

/// Which total a ranking sorts by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RankKey {
    /// Net lines (`added - deleted`), the default.
    #[default]
    NetLines,
    /// Commit count.
    Commits,
    /// Added lines.
    AddedLines,
}

/// Whole-period activity totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTotals {
    /// Commits in the period.
    pub commit_count: usize,
    /// Lines added.
    pub added: u64,
    /// Lines deleted.
    pub deleted: u64,
    /// `added - deleted`, may be negative.
    pub net: i64,
    /// Distinct `(repository, file)` pairs touched.
    pub distinct_files: usize,
    /// Distinct developers.
    pub distinct_authors: usize,
    /// Distinct repositories.
    pub distinct_repositories: usize,
    /// Commits changing fewer than `tiny_commit` total lines.
    pub tiny_commits: usize,
}

/// Rank developers by `key` descending, names ascending on ties.
///
/// # Examples
///
/// ```
/// use vitals_analytics::rankings::{rank_developers, RankKey};
///
/// assert!(rank_developers(&[], RankKey::default()).is_empty());
/// ```
pub fn rank_developers(commits: &[Commit], key: RankKey) -> Vec<DeveloperStats> {
    struct Acc {
        commit_count: usize,
        added: u64,
        deleted: u64,
        files: BTreeSet<(String, String)>,
        repositories: BTreeSet<String>,
    }

    let mut by_author: HashMap<String, Acc> = HashMap::new();
    for commit in commits {
        let acc = by_author.entry(commit.author.clone()).or_insert(Acc {
            commit_count: 0,
            added: 0,
            deleted: 0,
            files: BTreeSet::new(),
            repositories: BTreeSet::new(),
        });
        acc.commit_count += 1;
        acc.added += commit.added();
        acc.deleted += commit.deleted();
        acc.repositories.insert(commit.repository.clone());
        for file in &commit.files {
            acc.files
                .insert((commit.repository.clone(), file.path.clone()));
        }
    }

    let mut stats: Vec<DeveloperStats> = by_author
        .into_iter()
        .map(|(name, acc)| DeveloperStats {
            name,
            commit_count: acc.commit_count,
            added: acc.added,
            deleted: acc.deleted,
            net: acc.added as i64 - acc.deleted as i64,
            files_touched: acc.files.len(),
            repositories: acc.repositories.into_iter().collect(),
        })
        .collect();

    stats.sort_by(|a, b| {
        sort_value(b.commit_count, b.added, b.net, key)
            .cmp(&sort_value(a.commit_count, a.added, a.net, key))
            .then(a.name.cmp(&b.name))
    });
    stats
}

/// Rank repositories by `key` descending, names ascending on ties.
pub fn rank_repositories(commits: &[Commit], key: RankKey) -> Vec<RepositoryStats> {
    struct Acc {
        commit_count: usize,
        added: u64,
        deleted: u64,
        files: BTreeSet<String>,
        authors: BTreeSet<String>,
    }

    let mut by_repo: HashMap<String, Acc> = HashMap::new();
    for commit in commits {
        let acc = by_repo.entry(commit.repository.clone()).or_insert(Acc {
            commit_count: 0,
            added: 0,
            deleted: 0,
            files: BTreeSet::new(),
            authors: BTreeSet::new(),
        });
        acc.commit_count += 1;
        acc.added += commit.added();
        acc.deleted += commit.deleted();
        acc.authors.insert(commit.author.clone());
        for file in &commit.files {
            acc.files.insert(file.path.clone());
        }
    }

    let mut stats: Vec<RepositoryStats> = by_repo
        .into_iter()
        .map(|(name, acc)| RepositoryStats {
            name,
            commit_count: acc.commit_count,
            added: acc.added,
            deleted: acc.deleted,
            net: acc.added as i64 - acc.deleted as i64,
            files_touched: acc.files.len(),
            contributors: acc.authors.len(),
        })
        .collect();

    stats.sort_by(|a, b| {
        sort_value(b.commit_count, b.added, b.net, key)
            .cmp(&sort_value(a.commit_count, a.added, a.net, key))
            .then(a.name.cmp(&b.name))
    });
    stats
}

fn sort_value(commit_count: usize, added: u64, net: i64, key: RankKey) -> i64 {
    match key {
        RankKey::NetLines => net,
        RankKey::Commits => commit_count as i64,
        RankKey::AddedLines => added as i64,
    }
}

/// Compute whole-period totals.
pub fn totals(commits: &[Commit], thresholds: &Thresholds) -> ActivityTotals {
    let mut files: BTreeSet<(String, String)> = BTreeSet::new();
    let mut authors: BTreeSet<String> = BTreeSet::new();
    let mut repositories: BTreeSet<String> = BTreeSet::new();
    let mut totals = ActivityTotals {
        commit_count: commits.len(),
        ..ActivityTotals::default()
    };

    for commit in commits {
        let added = commit.added();
        let deleted = commit.deleted();
        totals.added += added;
        totals.deleted += deleted;
        if added + deleted < thresholds.tiny_commit {
            totals.tiny_commits += 1;
        }
        authors.insert(commit.author.clone());
        repositories.insert(commit.repository.clone());
        for file in &commit.files {
            files.insert((commit.repository.clone(), file.path.clone()));
        }
    }

    totals.net = totals.added as i64 - totals.deleted as i64;
    totals.distinct_files = files.len();
    totals.distinct_authors = authors.len();
    totals.distinct_repositories = repositories.len();
    totals
}

/// Truncate a ranked list for presentation. Totals are unaffected; this is
/// just a view of the head.
pub fn top<T>(ranked: &[T], k: usize) -> &[T] {
    &ranked[..k.min(ranked.len())]
}
