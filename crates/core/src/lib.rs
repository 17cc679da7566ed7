//! Core search-state types for folio.
//!
//! This crate provides:
//! - Search option value objects (filters, sort, pagination, object types)
//! - The frontend filter query-parameter codec
//! - Search configuration defaults with layered loading

pub mod config;
pub mod filter;
pub mod options;

pub use config::{ConfigError, SearchConfig};
pub use filter::{RawParams, SearchFilter};
pub use options::{
    DsoType, PaginatedSearchOptions, PaginationOptions, SearchFragments, SearchOptions, SortDirection, SortOptions,
};
