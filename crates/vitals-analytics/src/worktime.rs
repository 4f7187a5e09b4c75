//! Working-hour classification of commit timestamps.
//!
//! Each commit lands in exactly one bucket, with weekend taking precedence
//! over time-of-day and late night evaluated with wrap-around containment
//! (22:00-06:00 spans midnight). The health scorer additionally uses the
//! standalone predicates, which do not apply precedence: a Saturday 23:00
//! commit is both a weekend commit and a late-night commit.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use vitals_core::{Commit, WorkSchedule};

/// The working-hour bucket a commit timestamp falls into.
///
/// # Examples
///
/// ```
/// use vitals_analytics::worktime::WorkBucket;
///
/// assert_eq!(format!("{}", WorkBucket::LateNight), "late_night");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkBucket {
    /// Configured weekend day, regardless of time.
    Weekend,
    /// Late-night window on a workday.
    LateNight,
    /// Overtime window on a workday.
    Overtime,
    /// Anything else.
    Normal,
}

impl std::fmt::Display for WorkBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weekend => write!(f, "weekend"),
            Self::LateNight => write!(f, "late_night"),
            Self::Overtime => write!(f, "overtime"),
            Self::Normal => write!(f, "normal"),
        }
    }
}

/// Classify a timestamp into exactly one [`WorkBucket`].
///
/// Pure function of timestamp and schedule; precedence is weekend, then
/// late night, then overtime, then normal.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use vitals_core::VitalsConfig;
/// use vitals_analytics::worktime::{classify, WorkBucket};
///
/// let schedule = VitalsConfig::default().working_hours.resolve().unwrap();
/// // Saturday 23:00 is weekend even though it is also late at night
/// let ts = NaiveDate::from_ymd_opt(2026, 1, 3).unwrap().and_hms_opt(23, 0, 0).unwrap();
/// assert_eq!(classify(ts, &schedule), WorkBucket::Weekend);
/// ```
pub fn classify(ts: NaiveDateTime, schedule: &WorkSchedule) -> WorkBucket {
    if is_weekend(ts, schedule) {
        WorkBucket::Weekend
    } else if is_late_night(ts, schedule) {
        WorkBucket::LateNight
    } else if is_overtime(ts, schedule) {
        WorkBucket::Overtime
    } else {
        WorkBucket::Normal
    }
}

/// Whether the timestamp falls on a configured weekend day.
pub fn is_weekend(ts: NaiveDateTime, schedule: &WorkSchedule) -> bool {
    schedule.is_weekend_day(ts.weekday())
}

/// Whether the time of day falls in the late-night window, day ignored.
pub fn is_late_night(ts: NaiveDateTime, schedule: &WorkSchedule) -> bool {
    schedule.late_night.contains(ts.time())
}

/// Whether the time of day falls in the overtime window, day ignored.
pub fn is_overtime(ts: NaiveDateTime, schedule: &WorkSchedule) -> bool {
    schedule.overtime.contains(ts.time())
}

/// Commit counts per working-hour bucket over a reporting period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPattern {
    /// Commits during normal hours.
    pub normal: usize,
    /// Commits during overtime.
    pub overtime: usize,
    /// Commits late at night.
    pub late_night: usize,
    /// Commits on weekend days.
    pub weekend: usize,
}

/// Count commits per bucket.
pub fn summarize(commits: &[Commit], schedule: &WorkSchedule) -> WorkPattern {
    let mut pattern = WorkPattern::default();
    for commit in commits {
        match classify(commit.timestamp, schedule) {
            WorkBucket::Normal => pattern.normal += 1,
            WorkBucket::Overtime => pattern.overtime += 1,
            WorkBucket::LateNight => pattern.late_night += 1,
            WorkBucket::Weekend => pattern.weekend += 1,
        }
    }
    pattern
}
