//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while reading decoded match JSON
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to read match file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid match format: {0}")]
    InvalidFormat(String),
}

/// Errors that can occur during aggregation
///
/// Only a structurally invalid match fails the pipeline. Missing samples
/// are reported as zero/empty values instead.
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Invalid match: {0}")]
    InvalidMatch(String),
}

/// Errors that can occur in the match store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store I/O failed: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to serialize match report: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("No stored match matches '{0}'")]
    NotFound(String),

    #[error("Match prefix '{0}' is ambiguous ({1} matches)")]
    AmbiguousPrefix(String, usize),

    #[error("Invalid store path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur while loading pipeline configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}
