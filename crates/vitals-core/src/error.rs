use std::path::PathBuf;

/// Errors that can occur across the vitals crates.
///
/// Library crates use this type directly; analyzers themselves are pure and
/// only the config layer and the report pipeline can fail.
///
/// # Examples
///
/// ```
/// use vitals_core::VitalsError;
///
/// let err = VitalsError::Config("churn_count must be positive".into());
/// assert!(err.to_string().contains("churn_count"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum VitalsError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration. Raised before any analysis begins.
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: VitalsError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn config_error_displays_message() {
        let err = VitalsError::Config("bad value".into());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn file_not_found_shows_path() {
        let err = VitalsError::FileNotFound(PathBuf::from("/tmp/vitals.toml"));
        assert!(err.to_string().contains("/tmp/vitals.toml"));
    }
}
