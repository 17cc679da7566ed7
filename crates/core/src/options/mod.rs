//! Search option value objects and their composition.
//!
//! A [`SearchOptions`] describes everything about one search request except
//! how its results are paged; [`PaginatedSearchOptions`] adds pagination and
//! sort. Both are immutable value objects with structural equality,
//! rebuilt on every change rather than mutated in place.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::filter::SearchFilter;

mod dso;
mod pagination;
mod sort;

pub use dso::{DsoType, UnknownDsoType};
pub use pagination::PaginationOptions;
pub use sort::{SortDirection, SortOptions, UnknownSortDirection};

/// Query parameter names shared by the frontend route and the search backend.
pub const CONFIGURATION_PARAM: &str = "configuration";
pub const QUERY_PARAM: &str = "query";
pub const SCOPE_PARAM: &str = "scope";
pub const DSO_TYPE_PARAM: &str = "dsoType";

/// One search request, minus pagination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub configuration: String,
    pub query: String,
    pub scope: String,
    pub dso_types: BTreeSet<DsoType>,
    pub filters: Vec<SearchFilter>,
}

/// Independently-sourced pieces of a [`SearchOptions`].
///
/// Each fragment comes from its own parameter; a `None` means the source had
/// nothing to contribute and the field defaults to its empty value.
#[derive(Debug, Clone, Default)]
pub struct SearchFragments {
    pub scope: Option<String>,
    pub configuration: Option<String>,
    pub query: Option<String>,
    pub dso_type: Option<DsoType>,
    pub filters: Option<Vec<SearchFilter>>,
}

impl SearchOptions {
    /// Compose options from fragments. Pure composition, no validation;
    /// the search backend owns semantic validation.
    pub fn from_fragments(fragments: SearchFragments) -> Self {
        SearchOptions {
            configuration: fragments.configuration.unwrap_or_default(),
            query: fragments.query.unwrap_or_default(),
            scope: fragments.scope.unwrap_or_default(),
            dso_types: fragments.dso_type.into_iter().collect(),
            filters: fragments.filters.unwrap_or_default(),
        }
    }

    /// Serialize to ordered query parameters for the search backend.
    ///
    /// Empty fragments are omitted; filters use the backend's
    /// `f.<field>=<value>,<operator>` value syntax.
    pub fn to_query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if !self.configuration.is_empty() {
            params.push((CONFIGURATION_PARAM.to_string(), self.configuration.clone()));
        }
        if !self.query.is_empty() {
            params.push((QUERY_PARAM.to_string(), self.query.clone()));
        }
        if !self.scope.is_empty() {
            params.push((SCOPE_PARAM.to_string(), self.scope.clone()));
        }
        for dso in &self.dso_types {
            params.push((DSO_TYPE_PARAM.to_string(), dso.to_string()));
        }
        for filter in &self.filters {
            for value in &filter.values {
                params.push((format!("f.{}", filter.field), format!("{value},{}", filter.operator)));
            }
        }
        params
    }
}

/// A complete, pageable search request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedSearchOptions {
    #[serde(flatten)]
    pub search: SearchOptions,
    pub pagination: PaginationOptions,
    pub sort: SortOptions,
}

impl PaginatedSearchOptions {
    /// Structural composition only.
    pub fn new(search: SearchOptions, pagination: PaginationOptions, sort: SortOptions) -> Self {
        PaginatedSearchOptions { search, pagination, sort }
    }

    /// Serialize to ordered query parameters, appending `page` (0-based),
    /// `size` and `sort` to the base options.
    pub fn to_query_params(&self) -> Vec<(String, String)> {
        let mut params = self.search.to_query_params();
        params.push(("page".to_string(), self.pagination.zero_based_page().to_string()));
        params.push(("size".to_string(), self.pagination.page_size.to_string()));
        params.push(("sort".to_string(), format!("{},{}", self.sort.field, self.sort.direction)));
        params
    }
}
