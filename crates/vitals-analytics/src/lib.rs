//! Commit-stream health analytics: churn, rework, hotspots, and scoring.
//!
//! Takes a normalized list of commit records spanning one or more
//! repositories and a reporting window, and derives the signals the rest of
//! the system formats and delivers: churning files, reworked lines, hotspot
//! rankings, per-developer and per-repository totals, working-hour
//! classification, and an aggregate 0-100 health score.
//!
//! Every analyzer is a pure function of (commits, config); the pipeline in
//! [`report`] runs them all and assembles the single structured result.

pub mod churn;
pub mod health;
pub mod hotspots;
pub mod normalize;
pub mod rankings;
pub mod report;
pub mod rework;
pub mod worktime;
