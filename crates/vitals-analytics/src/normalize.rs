//! Commit normalization and cross-branch deduplication.
//!
//! Providers enumerate branches independently, so the same commit id can be
//! observed several times; the normalizer keeps the first observation per
//! `(repository, id)` pair, parses timestamps, drops malformed records with
//! a warning, and emits a chronologically sorted canonical list.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use vitals_core::{Commit, RawCommit};

/// Why a raw record was dropped during normalization.
///
/// # Examples
///
/// ```
/// use vitals_analytics::normalize::DropReason;
///
/// let reason = DropReason::MissingAuthor;
/// assert_eq!(format!("{reason}"), "missing author");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DropReason {
    /// Author field was empty or whitespace.
    MissingAuthor,
    /// Timestamp could not be parsed in any accepted format.
    BadTimestamp,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingAuthor => write!(f, "missing author"),
            Self::BadTimestamp => write!(f, "unparsable timestamp"),
        }
    }
}

/// A malformed record dropped during normalization. Non-fatal: the pipeline
/// continues on the remaining records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedRecord {
    /// Commit id of the offending record.
    pub id: String,
    /// Repository the record came from.
    pub repository: String,
    /// Why it was dropped.
    pub reason: DropReason,
}

/// Result of normalizing a raw commit stream.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    /// Canonical commits, sorted by timestamp then id.
    pub commits: Vec<Commit>,
    /// Malformed records that were dropped.
    pub dropped: Vec<DroppedRecord>,
    /// Duplicate observations discarded by cross-branch dedup.
    pub duplicates: usize,
}

/// Normalize a raw commit stream into canonical, deduplicated, sorted form.
///
/// The first observation of a `(repository, id)` pair wins; later ones are
/// the same physical change seen through another branch and are discarded
/// without summing their file lists. Records with a missing author or an
/// unparsable timestamp are dropped and reported in
/// [`NormalizeOutcome::dropped`].
///
/// # Examples
///
/// ```
/// use vitals_core::RawCommit;
/// use vitals_analytics::normalize::normalize;
///
/// let raw = vec![
///     RawCommit {
///         id: "c1".into(),
///         author: "alice".into(),
///         email: String::new(),
///         timestamp: "2026-01-05 14:30:00".into(),
///         repository: "billing".into(),
///         message: "fix".into(),
///         files: vec![],
///     },
///     // same commit observed via another branch
///     RawCommit {
///         id: "c1".into(),
///         author: "alice".into(),
///         email: String::new(),
///         timestamp: "2026-01-05 14:30:00".into(),
///         repository: "billing".into(),
///         message: "fix".into(),
///         files: vec![],
///     },
/// ];
/// let outcome = normalize(&raw);
/// assert_eq!(outcome.commits.len(), 1);
/// assert_eq!(outcome.duplicates, 1);
/// ```
pub fn normalize(raw: &[RawCommit]) -> NormalizeOutcome {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut outcome = NormalizeOutcome::default();

    for record in raw {
        let key = (record.repository.clone(), record.id.clone());
        if seen.contains(&key) {
            outcome.duplicates += 1;
            continue;
        }

        if record.author.trim().is_empty() {
            seen.insert(key);
            outcome.dropped.push(DroppedRecord {
                id: record.id.clone(),
                repository: record.repository.clone(),
                reason: DropReason::MissingAuthor,
            });
            continue;
        }

        let Some(timestamp) = parse_timestamp(&record.timestamp) else {
            seen.insert(key);
            outcome.dropped.push(DroppedRecord {
                id: record.id.clone(),
                repository: record.repository.clone(),
                reason: DropReason::BadTimestamp,
            });
            continue;
        };

        seen.insert(key);
        outcome.commits.push(Commit {
            id: record.id.clone(),
            author: record.author.trim().to_string(),
            email: record.email.clone(),
            timestamp,
            repository: record.repository.clone(),
            message: record.message.clone(),
            files: record.files.clone(),
        });
    }

    outcome
        .commits
        .sort_by(|a, b| (a.timestamp, &a.id).cmp(&(b.timestamp, &b.id)));
    outcome
}

/// Parse a provider timestamp into a wall-clock time.
///
/// Accepts `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DDTHH:MM:SS`, with an optional
/// trailing offset (`+0800`, `Z`). The offset is discarded: classification
/// works on the wall clock the author saw, not a shifted UTC instant.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts);
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%dT%H:%M:%S%z"] {
        if let Ok(ts) = DateTime::parse_from_str(raw, fmt) {
            return Some(ts.naive_local());
        }
    }
    // Fallback: the leading 19 characters of anything ISO-ish.
    if raw.len() >= 19 {
        let head = &raw[..19];
        for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
            if let Ok(ts) = NaiveDateTime::parse_from_str(head, fmt) {
                return Some(ts);
            }
        }
    }
    None
}
