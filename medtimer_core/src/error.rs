//! Error types for the medtimer_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for medtimer_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unparseable schedule time string
    #[error("Invalid time '{0}': expected zero-padded 24h HH:MM")]
    Format(String),

    /// Imported backup document missing required structure
    #[error("Restore failed: {0}")]
    Restore(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Invalid setup wizard transition
    #[error("Setup error: {0}")]
    Setup(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
