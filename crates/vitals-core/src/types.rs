use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A commit observation as delivered by an upstream provider.
///
/// Providers may observe the same commit through more than one branch
/// traversal, and may deliver records with missing fields or timestamps in
/// heterogeneous text formats. The normalizer turns these into canonical
/// [`Commit`] values.
///
/// # Examples
///
/// ```
/// use vitals_core::RawCommit;
///
/// let raw = RawCommit {
///     id: "a1b2c3d4".into(),
///     author: "alice".into(),
///     email: "alice@example.com".into(),
///     timestamp: "2026-01-05 14:30:00".into(),
///     repository: "billing".into(),
///     message: "fix: rounding in invoice totals".into(),
///     files: vec![],
/// };
/// assert_eq!(raw.repository, "billing");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCommit {
    /// Commit id, unique within its repository.
    pub id: String,
    /// Author name as reported by the provider. May be empty on bad data.
    pub author: String,
    /// Author email.
    #[serde(default)]
    pub email: String,
    /// Commit time as text, e.g. `"2026-01-05 14:30:00"` or ISO-8601.
    pub timestamp: String,
    /// Repository the commit belongs to.
    pub repository: String,
    /// First line of the commit message.
    #[serde(default)]
    pub message: String,
    /// Per-file line deltas.
    #[serde(default)]
    pub files: Vec<FileChange>,
}

/// A canonical, validated commit record.
///
/// Produced by the normalizer: deduplicated across branches, timestamp
/// parsed, sorted chronologically.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use vitals_core::{Commit, FileChange};
///
/// let commit = Commit {
///     id: "a1b2c3d4".into(),
///     author: "alice".into(),
///     email: "alice@example.com".into(),
///     timestamp: NaiveDate::from_ymd_opt(2026, 1, 5)
///         .unwrap()
///         .and_hms_opt(14, 30, 0)
///         .unwrap(),
///     repository: "billing".into(),
///     message: "fix: rounding in invoice totals".into(),
///     files: vec![FileChange { path: "src/invoice.rs".into(), added: 12, deleted: 4 }],
/// };
/// assert_eq!(commit.added(), 12);
/// assert_eq!(commit.net(), 8);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    /// Commit id, unique within its repository.
    pub id: String,
    /// Canonical author identity.
    pub author: String,
    /// Author email.
    pub email: String,
    /// Commit wall-clock time in the reporting timezone.
    pub timestamp: NaiveDateTime,
    /// Repository the commit belongs to.
    pub repository: String,
    /// First line of the commit message.
    pub message: String,
    /// Per-file line deltas.
    pub files: Vec<FileChange>,
}

impl Commit {
    /// Total lines added across all files.
    pub fn added(&self) -> u64 {
        self.files.iter().map(|f| f.added).sum()
    }

    /// Total lines deleted across all files.
    pub fn deleted(&self) -> u64 {
        self.files.iter().map(|f| f.deleted).sum()
    }

    /// Net line delta (`added - deleted`), may be negative.
    pub fn net(&self) -> i64 {
        self.added() as i64 - self.deleted() as i64
    }
}

/// A single file change within a commit.
///
/// # Examples
///
/// ```
/// use vitals_core::FileChange;
///
/// let change = FileChange { path: "src/main.rs".into(), added: 10, deleted: 3 };
/// assert_eq!(change.net(), 7);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChange {
    /// File path relative to the repository root.
    pub path: String,
    /// Lines added in this commit.
    pub added: u64,
    /// Lines deleted in this commit.
    pub deleted: u64,
}

impl FileChange {
    /// Net line delta (`added - deleted`), may be negative.
    pub fn net(&self) -> i64 {
        self.added as i64 - self.deleted as i64
    }
}

/// The reporting period, half-open: `[start, end)`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use vitals_core::Window;
///
/// let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let end = NaiveDate::from_ymd_opt(2026, 1, 8).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let window = Window { start, end };
/// assert!(window.contains(start));
/// assert!(!window.contains(end));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    /// Inclusive start of the period.
    pub start: NaiveDateTime,
    /// Exclusive end of the period.
    pub end: NaiveDateTime,
}

impl Window {
    /// Whether `ts` falls inside the period.
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        ts >= self.start && ts < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn commit_totals_sum_over_files() {
        let commit = Commit {
            id: "c1".into(),
            author: "alice".into(),
            email: "alice@example.com".into(),
            timestamp: at(5, 10),
            repository: "billing".into(),
            message: "refactor".into(),
            files: vec![
                FileChange {
                    path: "a.rs".into(),
                    added: 30,
                    deleted: 10,
                },
                FileChange {
                    path: "b.rs".into(),
                    added: 5,
                    deleted: 40,
                },
            ],
        };
        assert_eq!(commit.added(), 35);
        assert_eq!(commit.deleted(), 50);
        assert_eq!(commit.net(), -15);
    }

    #[test]
    fn window_is_half_open() {
        let window = Window {
            start: at(1, 0),
            end: at(8, 0),
        };
        assert!(window.contains(at(1, 0)));
        assert!(window.contains(at(7, 23)));
        assert!(!window.contains(at(8, 0)));
        assert!(!window.contains(at(9, 0)));
    }

    #[test]
    fn file_change_net_can_go_negative() {
        let change = FileChange {
            path: "a.rs".into(),
            added: 2,
            deleted: 9,
        };
        assert_eq!(change.net(), -7);
    }
}
