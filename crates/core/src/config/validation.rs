//! Configuration validation rules.
//!
//! This module provides validation logic for `SearchConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::SearchConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl SearchConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `default_page_size` or `max_page_size` is 0
    /// - `default_page_size` exceeds `max_page_size`
    /// - `default_sort_field` or `pagination_id` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "default_page_size".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.max_page_size == 0 {
            return Err(ConfigError::Invalid { field: "max_page_size".into(), reason: "must be greater than 0".into() });
        }
        if self.default_page_size > self.max_page_size {
            return Err(ConfigError::Invalid {
                field: "default_page_size".into(),
                reason: "must not exceed max_page_size".into(),
            });
        }

        if self.default_sort_field.is_empty() {
            return Err(ConfigError::Invalid { field: "default_sort_field".into(), reason: "must not be empty".into() });
        }
        if self.pagination_id.is_empty() {
            return Err(ConfigError::Invalid { field: "pagination_id".into(), reason: "must not be empty".into() });
        }

        if self.max_page_size > 1000 {
            tracing::warn!(max_page_size = self.max_page_size, "max_page_size is unusually large for a result list");
        }

        Ok(())
    }
}
