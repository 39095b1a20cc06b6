//! Coordinator and extraction pipeline configuration

use super::validation::{ConfigDefaults, ConfigResult, ConfigValidator, Validator};
use crate::{jsonpath::PathPattern, record::CompletenessPolicy};

/// Settings for a [`Coordinator`](crate::coordinator::Coordinator)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Pattern selecting candidate record objects
    pub target_path: String,
    /// Path of the document's center node string
    pub center_path: String,
    /// Schema variant records must satisfy
    pub completeness: CompletenessPolicy,
    /// Distinct keys kept in the recent-keys index
    pub recent_capacity: usize,
    /// Initial capacity of each session's record log
    pub initial_buffer_capacity: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            target_path: ConfigDefaults::TARGET_PATH.to_string(),
            center_path: ConfigDefaults::CENTER_PATH.to_string(),
            completeness: CompletenessPolicy::default(),
            recent_capacity: ConfigDefaults::RECENT_CAPACITY,
            initial_buffer_capacity: ConfigDefaults::INITIAL_BUFFER_CAPACITY,
        }
    }
}

impl CoordinatorConfig {
    /// Preset for generators that always emit `explorationMethods`
    #[must_use]
    pub fn strict() -> Self {
        Self {
            completeness: CompletenessPolicy::strict(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_target_path(mut self, path: impl Into<String>) -> Self {
        self.target_path = path.into();
        self
    }

    #[must_use]
    pub fn with_center_path(mut self, path: impl Into<String>) -> Self {
        self.center_path = path.into();
        self
    }

    #[must_use]
    pub fn with_completeness(mut self, policy: CompletenessPolicy) -> Self {
        self.completeness = policy;
        self
    }

    #[must_use]
    pub fn with_recent_capacity(mut self, capacity: usize) -> Self {
        self.recent_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_initial_buffer_capacity(mut self, capacity: usize) -> Self {
        self.initial_buffer_capacity = capacity;
        self
    }

    /// Parse both path patterns
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidPath` if either pattern is invalid.
    pub fn patterns(&self) -> ConfigResult<(PathPattern, PathPattern)> {
        Ok((
            ConfigValidator::validate_path(&self.target_path, "target_path")?,
            ConfigValidator::validate_path(&self.center_path, "center_path")?,
        ))
    }
}

impl Validator for CoordinatorConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.patterns()?;
        ConfigValidator::validate_capacity(
            self.recent_capacity,
            ConfigDefaults::MAX_RECENT_CAPACITY,
            "recent_capacity",
        )?;
        ConfigValidator::validate_capacity(
            self.initial_buffer_capacity,
            ConfigDefaults::MAX_BUFFER_CAPACITY,
            "initial_buffer_capacity",
        )?;
        Ok(())
    }
}
