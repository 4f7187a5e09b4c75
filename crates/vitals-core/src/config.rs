use std::path::Path;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::VitalsError;

/// Top-level configuration loaded from `vitals.toml`.
///
/// Every field has a serde default, so an empty file (or no file at all)
/// yields the stock thresholds. [`VitalsConfig::validate`] must pass before
/// any analysis runs; a bad threshold is fatal, not skippable.
///
/// # Examples
///
/// ```
/// use vitals_core::VitalsConfig;
///
/// let config = VitalsConfig::default();
/// assert_eq!(config.thresholds.large_commit, 500);
/// assert_eq!(config.thresholds.churn_count, 5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VitalsConfig {
    /// Analyzer thresholds.
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Working-hour window definitions.
    #[serde(default)]
    pub working_hours: WorkingHours,
    /// Hotspot score weights.
    #[serde(default)]
    pub weights: HotspotWeights,
    /// Health score bands and tier cutoffs.
    #[serde(default)]
    pub health: HealthBands,
}

impl VitalsConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`VitalsError::Io`] if the file cannot be read, or
    /// [`VitalsError::Toml`] if the content is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self, VitalsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`VitalsError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use vitals_core::VitalsConfig;
    ///
    /// let toml = r#"
    /// [thresholds]
    /// churn_days = 5
    /// churn_count = 8
    /// "#;
    /// let config = VitalsConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.thresholds.churn_days, 5);
    /// assert_eq!(config.thresholds.churn_count, 8);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, VitalsError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Check that every threshold, band, and time window is well-formed.
    ///
    /// # Errors
    ///
    /// Returns [`VitalsError::Config`] naming the first offending option.
    pub fn validate(&self) -> Result<(), VitalsError> {
        self.thresholds.validate()?;
        self.weights.validate()?;
        self.health.validate()?;
        self.working_hours.resolve()?;
        Ok(())
    }
}

/// Analyzer thresholds.
///
/// Defaults match the stock profile: a 500-line commit is large, a file
/// touched 5 times in 3 days is churning, additions deleted within 3 days
/// of a 7-day observation horizon are rework, and so on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thresholds {
    /// Net added lines at which a commit counts as large (default: 500).
    #[serde(default = "default_large_commit")]
    pub large_commit: u64,
    /// Total changed lines below which a commit counts as tiny (default: 10).
    #[serde(default = "default_tiny_commit")]
    pub tiny_commit: u64,
    /// Churn detection span in days (default: 3).
    #[serde(default = "default_churn_days")]
    pub churn_days: i64,
    /// Modifications within the span that flag a file as churning (default: 5).
    #[serde(default = "default_churn_count")]
    pub churn_count: usize,
    /// Days a pending addition stays eligible for rework matching (default: 7).
    #[serde(default = "default_rework_add_days")]
    pub rework_add_days: i64,
    /// Days after an addition within which a deletion counts as rework (default: 3).
    #[serde(default = "default_rework_delete_days")]
    pub rework_delete_days: i64,
    /// Hotspot detection span in days (default: 7).
    #[serde(default = "default_hotspot_days")]
    pub hotspot_days: i64,
    /// Modifications within the span that flag a file as a hotspot (default: 10).
    #[serde(default = "default_hotspot_count")]
    pub hotspot_count: usize,
    /// Estimated line count above which a file counts as large (default: 1000).
    #[serde(default = "default_large_file")]
    pub large_file: u64,
}

fn default_large_commit() -> u64 {
    500
}

fn default_tiny_commit() -> u64 {
    10
}

fn default_churn_days() -> i64 {
    3
}

fn default_churn_count() -> usize {
    5
}

fn default_rework_add_days() -> i64 {
    7
}

fn default_rework_delete_days() -> i64 {
    3
}

fn default_hotspot_days() -> i64 {
    7
}

fn default_hotspot_count() -> usize {
    10
}

fn default_large_file() -> u64 {
    1000
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            large_commit: default_large_commit(),
            tiny_commit: default_tiny_commit(),
            churn_days: default_churn_days(),
            churn_count: default_churn_count(),
            rework_add_days: default_rework_add_days(),
            rework_delete_days: default_rework_delete_days(),
            hotspot_days: default_hotspot_days(),
            hotspot_count: default_hotspot_count(),
            large_file: default_large_file(),
        }
    }
}

impl Thresholds {
    fn validate(&self) -> Result<(), VitalsError> {
        let positive: [(&str, i64); 8] = [
            ("large_commit", self.large_commit as i64),
            ("churn_days", self.churn_days),
            ("churn_count", self.churn_count as i64),
            ("rework_add_days", self.rework_add_days),
            ("rework_delete_days", self.rework_delete_days),
            ("hotspot_days", self.hotspot_days),
            ("hotspot_count", self.hotspot_count as i64),
            ("large_file", self.large_file as i64),
        ];
        for (name, value) in positive {
            if value <= 0 {
                return Err(VitalsError::Config(format!("{name} must be positive, got {value}")));
            }
        }
        Ok(())
    }
}

/// Working-hour window definitions, as `"HH:MM"` strings plus a weekend
/// day list. Resolved into a [`WorkSchedule`] before use; resolution is the
/// validation step for this section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingHours {
    /// Start of normal hours (default: `"09:00"`).
    #[serde(default = "default_normal_start")]
    pub normal_start: String,
    /// End of normal hours (default: `"18:00"`).
    #[serde(default = "default_normal_end")]
    pub normal_end: String,
    /// Start of overtime (default: `"18:00"`).
    #[serde(default = "default_overtime_start")]
    pub overtime_start: String,
    /// End of overtime (default: `"21:00"`).
    #[serde(default = "default_overtime_end")]
    pub overtime_end: String,
    /// Start of late night; may wrap past midnight (default: `"22:00"`).
    #[serde(default = "default_late_night_start")]
    pub late_night_start: String,
    /// End of late night (default: `"06:00"`).
    #[serde(default = "default_late_night_end")]
    pub late_night_end: String,
    /// Weekend day names (default: `["saturday", "sunday"]`).
    #[serde(default = "default_weekend")]
    pub weekend: Vec<String>,
}

fn default_normal_start() -> String {
    "09:00".into()
}

fn default_normal_end() -> String {
    "18:00".into()
}

fn default_overtime_start() -> String {
    "18:00".into()
}

fn default_overtime_end() -> String {
    "21:00".into()
}

fn default_late_night_start() -> String {
    "22:00".into()
}

fn default_late_night_end() -> String {
    "06:00".into()
}

fn default_weekend() -> Vec<String> {
    vec!["saturday".into(), "sunday".into()]
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            normal_start: default_normal_start(),
            normal_end: default_normal_end(),
            overtime_start: default_overtime_start(),
            overtime_end: default_overtime_end(),
            late_night_start: default_late_night_start(),
            late_night_end: default_late_night_end(),
            weekend: default_weekend(),
        }
    }
}

impl WorkingHours {
    /// Parse the textual windows into a [`WorkSchedule`].
    ///
    /// # Errors
    ///
    /// Returns [`VitalsError::Config`] on an unparsable time, an unknown
    /// weekend day, or a zero-width window (`start == end` cannot be
    /// resolved even with wrap-around).
    pub fn resolve(&self) -> Result<WorkSchedule, VitalsError> {
        let normal = TimeRange::new("normal", &self.normal_start, &self.normal_end)?;
        let overtime = TimeRange::new("overtime", &self.overtime_start, &self.overtime_end)?;
        let late_night =
            TimeRange::new("late_night", &self.late_night_start, &self.late_night_end)?;

        let mut weekend = Vec::with_capacity(self.weekend.len());
        for name in &self.weekend {
            weekend.push(parse_weekday(name)?);
        }

        Ok(WorkSchedule {
            normal,
            overtime,
            late_night,
            weekend,
        })
    }
}

/// A resolved time-of-day window. `start > end` means the window wraps past
/// midnight (e.g. 22:00–06:00).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    /// Inclusive start of the window.
    pub start: NaiveTime,
    /// Exclusive end of the window.
    pub end: NaiveTime,
}

impl TimeRange {
    fn new(name: &str, start: &str, end: &str) -> Result<Self, VitalsError> {
        let start = parse_time(name, start)?;
        let end = parse_time(name, end)?;
        if start == end {
            return Err(VitalsError::Config(format!(
                "{name} window is zero-width ({start}); start and end must differ"
            )));
        }
        Ok(Self { start, end })
    }

    /// Whether `t` falls inside the window, with wrap-around when
    /// `start > end`.
    pub fn contains(&self, t: NaiveTime) -> bool {
        if self.start < self.end {
            self.start <= t && t < self.end
        } else {
            t >= self.start || t < self.end
        }
    }
}

/// Working-hour windows resolved into comparable times.
#[derive(Debug, Clone)]
pub struct WorkSchedule {
    /// Normal working hours.
    pub normal: TimeRange,
    /// Overtime hours.
    pub overtime: TimeRange,
    /// Late-night hours, usually wrapping past midnight.
    pub late_night: TimeRange,
    /// Days that count as weekend.
    pub weekend: Vec<Weekday>,
}

impl WorkSchedule {
    /// Whether `day` is part of the configured weekend.
    pub fn is_weekend_day(&self, day: Weekday) -> bool {
        self.weekend.contains(&day)
    }
}

fn parse_time(name: &str, value: &str) -> Result<NaiveTime, VitalsError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| {
            VitalsError::Config(format!("{name} window has unparsable time {value:?}"))
        })
}

fn parse_weekday(name: &str) -> Result<Weekday, VitalsError> {
    match name.to_ascii_lowercase().as_str() {
        "monday" | "mon" => Ok(Weekday::Mon),
        "tuesday" | "tue" => Ok(Weekday::Tue),
        "wednesday" | "wed" => Ok(Weekday::Wed),
        "thursday" | "thu" => Ok(Weekday::Thu),
        "friday" | "fri" => Ok(Weekday::Fri),
        "saturday" | "sat" => Ok(Weekday::Sat),
        "sunday" | "sun" => Ok(Weekday::Sun),
        other => Err(VitalsError::Config(format!("unknown weekend day {other:?}"))),
    }
}

/// Weights for the composite hotspot score.
///
/// `score = modification·count + contributors·authors + size·ln(lines)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotspotWeights {
    /// Weight on modification count (default: 1.0).
    #[serde(default = "default_weight_modification")]
    pub modification: f64,
    /// Weight on distinct author count (default: 0.8).
    #[serde(default = "default_weight_contributors")]
    pub contributors: f64,
    /// Weight on the log of the estimated file size (default: 0.5).
    #[serde(default = "default_weight_size")]
    pub size: f64,
}

fn default_weight_modification() -> f64 {
    1.0
}

fn default_weight_contributors() -> f64 {
    0.8
}

fn default_weight_size() -> f64 {
    0.5
}

impl Default for HotspotWeights {
    fn default() -> Self {
        Self {
            modification: default_weight_modification(),
            contributors: default_weight_contributors(),
            size: default_weight_size(),
        }
    }
}

impl HotspotWeights {
    fn validate(&self) -> Result<(), VitalsError> {
        for (name, value) in [
            ("weights.modification", self.modification),
            ("weights.contributors", self.contributors),
            ("weights.size", self.size),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(VitalsError::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Health score bands and tier cutoffs.
///
/// Rates are fractions in `[0, 1]`: a churn rate of 0.30 means 30% of the
/// files touched in the period are churning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthBands {
    /// Churn rate above which penalties start (default: 0.10).
    #[serde(default = "default_churn_rate_warning")]
    pub churn_rate_warning: f64,
    /// Churn rate at which the full churn penalty applies (default: 0.30).
    #[serde(default = "default_churn_rate_danger")]
    pub churn_rate_danger: f64,
    /// Rework ratio above which penalties start (default: 0.15).
    #[serde(default = "default_rework_rate_warning")]
    pub rework_rate_warning: f64,
    /// Rework ratio at which the full rework penalty applies (default: 0.30).
    #[serde(default = "default_rework_rate_danger")]
    pub rework_rate_danger: f64,
    /// Score at or above which the tier is excellent (default: 80).
    #[serde(default = "default_score_excellent")]
    pub score_excellent: f64,
    /// Score at or above which the tier is good (default: 60).
    #[serde(default = "default_score_good")]
    pub score_good: f64,
    /// Score at or above which the tier is warning (default: 40).
    #[serde(default = "default_score_warning")]
    pub score_warning: f64,
}

fn default_churn_rate_warning() -> f64 {
    0.10
}

fn default_churn_rate_danger() -> f64 {
    0.30
}

fn default_rework_rate_warning() -> f64 {
    0.15
}

fn default_rework_rate_danger() -> f64 {
    0.30
}

fn default_score_excellent() -> f64 {
    80.0
}

fn default_score_good() -> f64 {
    60.0
}

fn default_score_warning() -> f64 {
    40.0
}

impl Default for HealthBands {
    fn default() -> Self {
        Self {
            churn_rate_warning: default_churn_rate_warning(),
            churn_rate_danger: default_churn_rate_danger(),
            rework_rate_warning: default_rework_rate_warning(),
            rework_rate_danger: default_rework_rate_danger(),
            score_excellent: default_score_excellent(),
            score_good: default_score_good(),
            score_warning: default_score_warning(),
        }
    }
}

impl HealthBands {
    fn validate(&self) -> Result<(), VitalsError> {
        if !(0.0..=1.0).contains(&self.churn_rate_warning)
            || !(0.0..=1.0).contains(&self.churn_rate_danger)
            || self.churn_rate_warning >= self.churn_rate_danger
        {
            return Err(VitalsError::Config(format!(
                "churn rate band must satisfy 0 <= warning < danger <= 1, got {} and {}",
                self.churn_rate_warning, self.churn_rate_danger
            )));
        }
        if !(0.0..=1.0).contains(&self.rework_rate_warning)
            || !(0.0..=1.0).contains(&self.rework_rate_danger)
            || self.rework_rate_warning >= self.rework_rate_danger
        {
            return Err(VitalsError::Config(format!(
                "rework rate band must satisfy 0 <= warning < danger <= 1, got {} and {}",
                self.rework_rate_warning, self.rework_rate_danger
            )));
        }
        if self.score_warning >= self.score_good || self.score_good >= self.score_excellent {
            return Err(VitalsError::Config(format!(
                "tier cutoffs must satisfy warning < good < excellent, got {} / {} / {}",
                self.score_warning, self.score_good, self.score_excellent
            )));
        }
        Ok(())
    }
}
