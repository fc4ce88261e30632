//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// A single problem found while validating a configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigIssue {
    #[error("{field} must be a positive, finite number of seconds (got {value})")]
    InvalidDuration { field: &'static str, value: f64 },

    #[error("{field} must be at least 1")]
    ZeroCapacity { field: &'static str },

    #[error("No output line mapped for {target}")]
    UnmappedOutput { target: String },

    #[error("Output line {pin} is assigned {uses} times")]
    DuplicateOutput { pin: u8, uses: usize },
}

/// Errors that can occur while loading configuration. All are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Every validation problem, not just the first
    #[error("Invalid configuration: {}", render(.issues))]
    Invalid { issues: Vec<ConfigIssue> },
}

fn render(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
