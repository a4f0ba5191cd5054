//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// A required environment variable was not set.
    ///
    /// Only the model credential is required, and only when the mock provider is off.
    #[error("missing required environment variable: {name}")]
    MissingEnvVar { name: &'static str },

    /// The model list parsed to nothing.
    #[error("model list is empty: at least one model identifier is required")]
    EmptyModelList,

    /// Batch parallelism must be at least one.
    #[error("invalid batch concurrency '{value}': must be at least 1")]
    InvalidBatchConcurrency { value: String },

    /// Retry settings are inconsistent.
    #[error("invalid retry policy: {reason}")]
    InvalidRetryPolicy { reason: String },
}
