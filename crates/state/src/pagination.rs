//! Pagination sub-store seam and its URL-backed implementation.
//!
//! Pagination state is keyed by an opaque scope id so several paginated
//! views can coexist on one page. [`RoutePaginationStore`] derives each
//! scope's state from its own query parameters: `<id>.page`, `<id>.rpp`
//! (results per page), `<id>.sf` (sort field) and `<id>.sd` (sort
//! direction). Anything absent or unparseable falls back to the caller's
//! defaults.

use std::rc::Rc;

use folio_core::{PaginationOptions, SearchConfig, SortOptions};

use crate::route::RouteSource;
use crate::signal::ValueStream;

/// Read access to per-scope pagination state.
pub trait PaginationSource {
    fn current_pagination(&self, id: &str, defaults: &PaginationOptions) -> ValueStream<PaginationOptions>;

    fn current_sort(&self, id: &str, defaults: &SortOptions) -> ValueStream<SortOptions>;
}

const PAGE_SUFFIX: &str = "page";
const PAGE_SIZE_SUFFIX: &str = "rpp";
const SORT_FIELD_SUFFIX: &str = "sf";
const SORT_DIRECTION_SUFFIX: &str = "sd";

/// Pagination state derived from `<id>.*` query parameters.
pub struct RoutePaginationStore {
    route: Rc<dyn RouteSource>,
    max_page_size: u32,
}

impl RoutePaginationStore {
    pub fn new(route: Rc<dyn RouteSource>, config: &SearchConfig) -> Self {
        RoutePaginationStore { route, max_page_size: config.max_page_size }
    }
}

/// First value of the `<id>.<suffix>` parameter, if present.
fn scoped_value(params: &[(String, Vec<String>)], id: &str, suffix: &str) -> Option<String> {
    let key = format!("{id}.{suffix}");
    params.iter().find(|(k, _)| *k == key).and_then(|(_, values)| values.first().cloned())
}

impl PaginationSource for RoutePaginationStore {
    fn current_pagination(&self, id: &str, defaults: &PaginationOptions) -> ValueStream<PaginationOptions> {
        let id = id.to_string();
        let defaults = defaults.clone();
        let max_page_size = self.max_page_size;
        self.route.query_parameters_with_prefix(&format!("{id}.")).map(move |params| {
            let current_page = scoped_value(params, &id, PAGE_SUFFIX)
                .and_then(|v| v.parse().ok())
                .filter(|page| *page >= 1)
                .unwrap_or(defaults.current_page);
            let page_size = scoped_value(params, &id, PAGE_SIZE_SUFFIX)
                .and_then(|v| v.parse().ok())
                .filter(|size| *size > 0)
                .unwrap_or(defaults.page_size)
                .min(max_page_size);
            PaginationOptions { id: id.clone(), current_page, page_size, max_size: defaults.max_size }
        })
    }

    fn current_sort(&self, id: &str, defaults: &SortOptions) -> ValueStream<SortOptions> {
        let id = id.to_string();
        let defaults = defaults.clone();
        self.route.query_parameters_with_prefix(&format!("{id}.")).map(move |params| {
            let field = scoped_value(params, &id, SORT_FIELD_SUFFIX)
                .filter(|f| !f.is_empty())
                .unwrap_or_else(|| defaults.field.clone());
            let direction = scoped_value(params, &id, SORT_DIRECTION_SUFFIX)
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.direction);
            SortOptions { field, direction }
        })
    }
}
