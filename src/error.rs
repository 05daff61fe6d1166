//! Error types for the fallible edges of the board.
//!
//! Graph operations themselves never fail; these cover configuration,
//! persistence and metadata resolution.

use thiserror::Error;

/// Errors raised while loading a [`crate::BoardConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration is not valid JSON for the expected shape
    #[error("Malformed configuration: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A value is out of its allowed range
    #[error("Invalid configuration value for `{field}`: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Errors raised while saving or loading board state.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The storage backend failed
    #[error("Storage backend error: {0}")]
    Storage(String),

    /// State could not be (de)serialized
    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The stored snapshot was written by a newer format
    #[error("Unsupported snapshot version {found} (newest supported is {supported})")]
    UnsupportedVersion {
        /// Version found in storage
        found: u32,
        /// Newest version this build understands
        supported: u32,
    },
}

/// Errors reported by a [`crate::MetadataResolver`].
#[derive(Error, Debug)]
pub enum MetadataError {
    /// The URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The lookup service could not be reached or answered with a failure status
    #[error("Metadata request failed: {0}")]
    Request(String),

    /// The lookup service answered with something unusable
    #[error("Malformed metadata response: {0}")]
    Malformed(String),
}
