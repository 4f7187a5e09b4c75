//! Core types, configuration, and error handling for vitals.
//!
//! This crate provides the shared foundation used by the analytics crate:
//! - [`VitalsError`] — unified error type using `thiserror`
//! - [`VitalsConfig`] — thresholds and working-hour windows, loaded from TOML
//! - Shared types: [`RawCommit`], [`Commit`], [`FileChange`], [`Window`]

mod config;
mod error;
mod types;

pub use config::{
    HealthBands, HotspotWeights, Thresholds, TimeRange, VitalsConfig, WorkSchedule, WorkingHours,
};
pub use error::VitalsError;
pub use types::{Commit, FileChange, RawCommit, Window};

/// A convenience `Result` type for vitals operations.
pub type Result<T> = std::result::Result<T, VitalsError>;
