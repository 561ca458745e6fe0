//! Error types for loading and applying mock scripts.

use thiserror::Error;

/// Script loading or application error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Unknown file type
    #[error("Unknown file type: {0}")]
    UnknownFileType(String),
    /// Script file could not be read
    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    /// Unreadable path while expanding a glob pattern
    #[error("Glob error: {0}")]
    Glob(#[from] glob::GlobError),
    /// Behaviour that cannot be registered as written
    #[error("Invalid behaviour for '{method}': {reason}")]
    InvalidBehaviour { method: String, reason: String },
}
