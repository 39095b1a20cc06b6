//! Configuration validation utilities

use crate::jsonpath::PathPattern;

/// Configuration validation result type
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid path pattern: {0}")]
    InvalidPath(String),

    #[error("Invalid capacity: {0}")]
    InvalidCapacity(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Invalid configuration parameter: {0}")]
    InvalidParameter(String),
}

/// Configuration validation trait
pub trait Validator {
    /// Validates the configuration settings
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` variant if any validation fails:
    /// - `InvalidPath` - if a path pattern does not parse
    /// - `InvalidCapacity` - if a capacity is zero or exceeds limits
    /// - `InvalidEndpoint` - if the transport endpoint is malformed
    /// - `InvalidParameter` - if parameters are outside valid ranges
    fn validate(&self) -> ConfigResult<()>;
}

/// Common configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate that a path pattern parses
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidPath` with the parser's message.
    pub fn validate_path(pattern: &str, name: &str) -> ConfigResult<PathPattern> {
        PathPattern::parse(pattern)
            .map_err(|e| ConfigurationError::InvalidPath(format!("{name}: {e}")))
    }

    /// Validate a capacity
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidCapacity` if the value is zero or
    /// exceeds `max`.
    pub fn validate_capacity(value: usize, max: usize, name: &str) -> ConfigResult<()> {
        if value == 0 {
            return Err(ConfigurationError::InvalidCapacity(format!(
                "{name} cannot be zero"
            )));
        }
        if value > max {
            return Err(ConfigurationError::InvalidCapacity(format!(
                "{name} cannot exceed {max}, got {value}"
            )));
        }
        Ok(())
    }

    /// Validate that a string parameter is non-empty
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidParameter` for empty or blank values.
    pub fn validate_non_empty(value: &str, name: &str) -> ConfigResult<()> {
        if value.trim().is_empty() {
            return Err(ConfigurationError::InvalidParameter(format!(
                "{name} cannot be empty"
            )));
        }
        Ok(())
    }
}

/// Common configuration defaults
pub struct ConfigDefaults;

impl ConfigDefaults {
    pub const TARGET_PATH: &'static str = "$.nodes[*]";
    pub const CENTER_PATH: &'static str = "$.centerNode";
    pub const RECENT_CAPACITY: usize = 100;
    pub const MAX_RECENT_CAPACITY: usize = 100_000;
    pub const INITIAL_BUFFER_CAPACITY: usize = 32;
    pub const MAX_BUFFER_CAPACITY: usize = 1 << 20;
    pub const ENDPOINT: &'static str = "/api/mindMap";
    pub const QUERY_PARAM: &'static str = "keyword";
    pub const ACCEPT: &'static str = "text/event-stream";
}
