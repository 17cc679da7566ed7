//! Search defaults with layered configuration loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (FOLIO_*)
//! 2. TOML config file (if FOLIO_CONFIG_FILE set)
//! 3. Built-in defaults

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::options::{PaginationOptions, SortDirection, SortOptions};

mod validation;

pub use validation::ConfigError;

/// Search defaults with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (FOLIO_*)
/// 2. TOML config file (if FOLIO_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Results per page when the URL carries no page size.
    ///
    /// Set via FOLIO_DEFAULT_PAGE_SIZE environment variable.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Upper cap applied to any requested page size.
    ///
    /// Set via FOLIO_MAX_PAGE_SIZE environment variable.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    /// Sort field for result lists when the URL carries none.
    ///
    /// Set via FOLIO_DEFAULT_SORT_FIELD environment variable.
    #[serde(default = "default_sort_field")]
    pub default_sort_field: String,

    /// Sort direction paired with the default sort field.
    ///
    /// Set via FOLIO_DEFAULT_SORT_DIRECTION environment variable.
    #[serde(default = "default_sort_direction")]
    pub default_sort_direction: SortDirection,

    /// Pagination scope id used by the search page.
    ///
    /// Set via FOLIO_PAGINATION_ID environment variable.
    #[serde(default = "default_pagination_id")]
    pub pagination_id: String,
}

fn default_page_size() -> u32 {
    20
}

fn default_max_page_size() -> u32 {
    100
}

fn default_sort_field() -> String {
    "score".into()
}

fn default_sort_direction() -> SortDirection {
    SortDirection::Desc
}

fn default_pagination_id() -> String {
    "spc".into()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            default_sort_field: default_sort_field(),
            default_sort_direction: default_sort_direction(),
            pagination_id: default_pagination_id(),
        }
    }
}

impl SearchConfig {
    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `FOLIO_`
    /// 2. TOML file from `FOLIO_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("FOLIO_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("FOLIO_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Pagination defaults for a pagination scope.
    pub fn default_pagination(&self, id: impl Into<String>) -> PaginationOptions {
        PaginationOptions::new(id, 1, self.default_page_size)
    }

    /// Sort defaults for search result lists.
    pub fn default_sort(&self) -> SortOptions {
        SortOptions::new(self.default_sort_field.clone(), self.default_sort_direction)
    }
}
