//! The search-state orchestration surface.
//!
//! [`SearchStateService`] derives the current search request from its two
//! injected collaborators: one getter per field, each a live value stream,
//! plus two composite subscriptions that rebuild the full options value
//! whenever any constituent changes. Combination is combine-latest: every
//! constituent stream caches its latest value, and each constituent
//! emission recomputes the composite from all of them.

use std::any::Any;
use std::rc::Rc;

use folio_core::filter::{self, FILTER_PREFIX};
use folio_core::options::{CONFIGURATION_PARAM, DSO_TYPE_PARAM, QUERY_PARAM, SCOPE_PARAM};
use folio_core::{
    DsoType, PaginatedSearchOptions, PaginationOptions, RawParams, SearchFilter, SearchOptions, SortOptions,
};

use crate::pagination::PaginationSource;
use crate::route::RouteSource;
use crate::signal::{Signal, Subscription, ValueStream};

/// Derives the current search request from the route and pagination sources.
pub struct SearchStateService {
    route: Rc<dyn RouteSource>,
    pagination: Rc<dyn PaginationSource>,
}

impl SearchStateService {
    pub fn new(route: Rc<dyn RouteSource>, pagination: Rc<dyn PaginationSource>) -> Self {
        SearchStateService { route, pagination }
    }

    /// Latest `scope` parameter; absent or empty falls back to the default.
    pub fn current_scope(&self, default: &str) -> ValueStream<String> {
        param_or_default(self.route.query_parameter(SCOPE_PARAM), default)
    }

    /// Latest `configuration` parameter; absent or empty falls back to the
    /// default.
    pub fn current_configuration(&self, default: &str) -> ValueStream<String> {
        param_or_default(self.route.query_parameter(CONFIGURATION_PARAM), default)
    }

    /// Latest `query` parameter; absent or empty falls back to the default.
    pub fn current_query(&self, default: &str) -> ValueStream<String> {
        param_or_default(self.route.query_parameter(QUERY_PARAM), default)
    }

    /// Latest `dsoType` parameter, parsed case-insensitively; unknown or
    /// absent values are `None`.
    pub fn current_dso_type(&self) -> ValueStream<Option<DsoType>> {
        self.route
            .query_parameter(DSO_TYPE_PARAM)
            .map(|value| value.as_deref().and_then(|v| v.parse().ok()))
    }

    /// Latest raw `f.`-prefixed parameter groups.
    pub fn current_frontend_filters(&self) -> ValueStream<RawParams> {
        self.route.query_parameters_with_prefix(FILTER_PREFIX)
    }

    /// Latest filters, decoded from the frontend parameter groups.
    pub fn current_filters(&self) -> ValueStream<Vec<SearchFilter>> {
        self.current_frontend_filters().map(|raw| filter::decode(raw))
    }

    /// Latest sort state for a pagination scope.
    pub fn current_sort(&self, pagination_id: &str, default: &SortOptions) -> ValueStream<SortOptions> {
        self.pagination.current_sort(pagination_id, default)
    }

    /// Latest pagination state for a pagination scope.
    pub fn current_pagination(
        &self, pagination_id: &str, default: &PaginationOptions,
    ) -> ValueStream<PaginationOptions> {
        self.pagination.current_pagination(pagination_id, default)
    }

    /// Live composite of everything except pagination: scope,
    /// configuration, query, object type and filters. The pagination source
    /// is never consulted on this path.
    pub fn search_options(&self, defaults: &SearchOptions) -> ValueStream<SearchOptions> {
        let parts = Rc::new(OptionParts {
            scope: self.current_scope(&defaults.scope),
            configuration: self.current_configuration(&defaults.configuration),
            query: self.current_query(&defaults.query),
            dso_type: self.current_dso_type(),
            filters: self.current_filters(),
        });
        let out = Signal::new(compose_options(&parts));
        let upstream: Vec<Box<dyn Any>> = vec![
            Box::new(recompute_on(&parts.scope, &parts, &out, compose_options)),
            Box::new(recompute_on(&parts.configuration, &parts, &out, compose_options)),
            Box::new(recompute_on(&parts.query, &parts, &out, compose_options)),
            Box::new(recompute_on(&parts.dso_type, &parts, &out, compose_options)),
            Box::new(recompute_on(&parts.filters, &parts, &out, compose_options)),
        ];
        ValueStream::derived(out, upstream)
    }

    /// Live composite of the full pageable request: the plain composite
    /// plus pagination and sort for the given scope.
    pub fn paginated_search_options(
        &self, pagination_id: &str, defaults: &PaginatedSearchOptions,
    ) -> ValueStream<PaginatedSearchOptions> {
        let parts = Rc::new(PaginatedParts {
            search: self.search_options(&defaults.search),
            pagination: self.current_pagination(pagination_id, &defaults.pagination),
            sort: self.current_sort(pagination_id, &defaults.sort),
        });
        let out = Signal::new(compose_paginated(&parts));
        let upstream: Vec<Box<dyn Any>> = vec![
            Box::new(recompute_on(&parts.search, &parts, &out, compose_paginated)),
            Box::new(recompute_on(&parts.pagination, &parts, &out, compose_paginated)),
            Box::new(recompute_on(&parts.sort, &parts, &out, compose_paginated)),
        ];
        ValueStream::derived(out, upstream)
    }
}

/// Resolve a scalar parameter against its default: absent or empty means
/// the default wins.
fn param_or_default(param: ValueStream<Option<String>>, default: &str) -> ValueStream<String> {
    let default = default.to_string();
    param.map(move |value| match value {
        Some(v) if !v.is_empty() => v.clone(),
        _ => default.clone(),
    })
}

struct OptionParts {
    scope: ValueStream<String>,
    configuration: ValueStream<String>,
    query: ValueStream<String>,
    dso_type: ValueStream<Option<DsoType>>,
    filters: ValueStream<Vec<SearchFilter>>,
}

fn compose_options(parts: &OptionParts) -> SearchOptions {
    SearchOptions {
        configuration: parts.configuration.get(),
        query: parts.query.get(),
        scope: parts.scope.get(),
        dso_types: parts.dso_type.get().into_iter().collect(),
        filters: parts.filters.get(),
    }
}

struct PaginatedParts {
    search: ValueStream<SearchOptions>,
    pagination: ValueStream<PaginationOptions>,
    sort: ValueStream<SortOptions>,
}

fn compose_paginated(parts: &PaginatedParts) -> PaginatedSearchOptions {
    PaginatedSearchOptions::new(parts.search.get(), parts.pagination.get(), parts.sort.get())
}

/// Recompute the composite from the latest value of every constituent each
/// time this one emits.
fn recompute_on<T: Clone + 'static, P: 'static, O: Clone + 'static>(
    constituent: &ValueStream<T>, parts: &Rc<P>, out: &Signal<O>, compose: fn(&P) -> O,
) -> Subscription {
    let parts = Rc::clone(parts);
    let out = out.clone();
    constituent.subscribe(move |_| out.set(compose(&parts)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::RoutePaginationStore;
    use crate::route::UrlRouteSource;
    use folio_core::{SearchConfig, SortDirection};
    use std::cell::{Cell, RefCell};

    /// Route source wrapper recording which parameters were requested.
    struct SpyRoute {
        inner: UrlRouteSource,
        requested: RefCell<Vec<String>>,
        prefixes: RefCell<Vec<String>>,
    }

    impl SpyRoute {
        fn at(url: &str) -> Rc<Self> {
            Rc::new(SpyRoute {
                inner: UrlRouteSource::from_url(url).unwrap(),
                requested: RefCell::new(Vec::new()),
                prefixes: RefCell::new(Vec::new()),
            })
        }
    }

    impl RouteSource for SpyRoute {
        fn query_parameter(&self, name: &str) -> ValueStream<Option<String>> {
            self.requested.borrow_mut().push(name.to_string());
            self.inner.query_parameter(name)
        }

        fn query_parameters_with_prefix(&self, prefix: &str) -> ValueStream<RawParams> {
            self.prefixes.borrow_mut().push(prefix.to_string());
            self.inner.query_parameters_with_prefix(prefix)
        }
    }

    /// Pagination source stub that serves the defaults and counts calls.
    struct SpyPagination {
        pagination_calls: Cell<usize>,
        sort_calls: Cell<usize>,
    }

    impl SpyPagination {
        fn new() -> Rc<Self> {
            Rc::new(SpyPagination { pagination_calls: Cell::new(0), sort_calls: Cell::new(0) })
        }
    }

    impl PaginationSource for SpyPagination {
        fn current_pagination(&self, _id: &str, defaults: &PaginationOptions) -> ValueStream<PaginationOptions> {
            self.pagination_calls.set(self.pagination_calls.get() + 1);
            ValueStream::source(Signal::new(defaults.clone()))
        }

        fn current_sort(&self, _id: &str, defaults: &SortOptions) -> ValueStream<SortOptions> {
            self.sort_calls.set(self.sort_calls.get() + 1);
            ValueStream::source(Signal::new(defaults.clone()))
        }
    }

    fn paginated_defaults() -> PaginatedSearchOptions {
        PaginatedSearchOptions::new(
            SearchOptions { configuration: "default".into(), ..Default::default() },
            PaginationOptions::new("page-id", 1, 20),
            SortOptions::new("score", SortDirection::Desc),
        )
    }

    #[test]
    fn test_current_scope_reads_scope_parameter() {
        let route = SpyRoute::at("http://localhost/search?scope=123");
        let service = SearchStateService::new(Rc::clone(&route) as Rc<dyn RouteSource>, SpyPagination::new());
        assert_eq!(service.current_scope("").get(), "123");
        assert_eq!(*route.requested.borrow(), vec!["scope"]);
    }

    #[test]
    fn test_scalar_getters_fall_back_to_defaults() {
        let route = SpyRoute::at("http://localhost/search");
        let service = SearchStateService::new(route, SpyPagination::new());
        assert_eq!(service.current_scope("fallback").get(), "fallback");
        assert_eq!(service.current_configuration("default").get(), "default");
        assert_eq!(service.current_query("").get(), "");
    }

    #[test]
    fn test_empty_parameter_falls_back_to_default() {
        let route = SpyRoute::at("http://localhost/search?configuration=");
        let service = SearchStateService::new(route, SpyPagination::new());
        assert_eq!(service.current_configuration("default").get(), "default");
    }

    #[test]
    fn test_current_dso_type_parses_case_insensitively() {
        let route = SpyRoute::at("http://localhost/search?dsoType=item");
        let service = SearchStateService::new(Rc::clone(&route) as Rc<dyn RouteSource>, SpyPagination::new());
        assert_eq!(service.current_dso_type().get(), Some(DsoType::Item));
        assert_eq!(*route.requested.borrow(), vec!["dsoType"]);
    }

    #[test]
    fn test_current_dso_type_unknown_is_none() {
        let route = SpyRoute::at("http://localhost/search?dsoType=workspace");
        let service = SearchStateService::new(route, SpyPagination::new());
        assert_eq!(service.current_dso_type().get(), None);
    }

    #[test]
    fn test_current_filters_decodes_frontend_parameters() {
        let route = SpyRoute::at("http://localhost/search?f.author=another+value&f.date.min=2013&f.date.max=2018");
        let service = SearchStateService::new(Rc::clone(&route) as Rc<dyn RouteSource>, SpyPagination::new());
        assert_eq!(
            service.current_filters().get(),
            vec![
                SearchFilter::query("author", vec!["another value".into()]),
                SearchFilter::with_operator("date", "equals", vec!["[2013 TO 2018]".into()]),
            ]
        );
        assert_eq!(*route.prefixes.borrow(), vec!["f."]);
    }

    #[test]
    fn test_search_options_never_touches_pagination() {
        let route = SpyRoute::at("http://localhost/search?scope=123&query=test");
        let pagination = SpyPagination::new();
        let service = SearchStateService::new(Rc::clone(&route) as Rc<dyn RouteSource>, Rc::clone(&pagination) as Rc<dyn PaginationSource>);

        let options = service.search_options(&paginated_defaults().search);

        assert_eq!(pagination.pagination_calls.get(), 0);
        assert_eq!(pagination.sort_calls.get(), 0);
        let requested = route.requested.borrow();
        assert!(requested.contains(&"scope".to_string()));
        assert!(requested.contains(&"configuration".to_string()));
        assert!(requested.contains(&"query".to_string()));
        assert!(requested.contains(&"dsoType".to_string()));
        assert_eq!(*route.prefixes.borrow(), vec!["f."]);
        assert_eq!(options.get().query, "test");
    }

    #[test]
    fn test_paginated_search_options_invokes_all_getters() {
        let route = SpyRoute::at("http://localhost/search");
        let pagination = SpyPagination::new();
        let service = SearchStateService::new(Rc::clone(&route) as Rc<dyn RouteSource>, Rc::clone(&pagination) as Rc<dyn PaginationSource>);

        let _options = service.paginated_search_options("page-id", &paginated_defaults());

        assert_eq!(pagination.pagination_calls.get(), 1);
        assert_eq!(pagination.sort_calls.get(), 1);
        let requested = route.requested.borrow();
        assert!(requested.contains(&"scope".to_string()));
        assert!(requested.contains(&"configuration".to_string()));
        assert!(requested.contains(&"query".to_string()));
        assert!(requested.contains(&"dsoType".to_string()));
        assert_eq!(*route.prefixes.borrow(), vec!["f."]);
    }

    #[test]
    fn test_paginated_composite_matches_route_state() {
        let route = SpyRoute::at("http://localhost/search?scope=123&configuration=default&query=test&f.author=jane");
        let service = SearchStateService::new(route, SpyPagination::new());

        let options = service.paginated_search_options("page-id", &paginated_defaults());

        assert_eq!(
            options.get(),
            PaginatedSearchOptions::new(
                SearchOptions {
                    configuration: "default".into(),
                    query: "test".into(),
                    scope: "123".into(),
                    dso_types: Default::default(),
                    filters: vec![SearchFilter::query("author", vec!["jane".into()])],
                },
                PaginationOptions::new("page-id", 1, 20),
                SortOptions::new("score", SortDirection::Desc),
            )
        );
    }

    #[test]
    fn test_composite_recomputes_on_navigation() {
        let route = Rc::new(UrlRouteSource::from_url("http://localhost/search?query=first").unwrap());
        let store =
            Rc::new(RoutePaginationStore::new(Rc::clone(&route) as Rc<dyn RouteSource>, &SearchConfig::default()));
        let service = SearchStateService::new(Rc::clone(&route) as Rc<dyn RouteSource>, store);

        let options = service.paginated_search_options("spc", &paginated_defaults());
        let emissions = Rc::new(Cell::new(0));
        let _sub = options.subscribe({
            let emissions = Rc::clone(&emissions);
            move |_| emissions.set(emissions.get() + 1)
        });

        route.navigate("http://localhost/search?query=second&spc.page=4").unwrap();

        let current = options.get();
        assert_eq!(current.search.query, "second");
        assert_eq!(current.pagination.current_page, 4);
        assert!(emissions.get() > 1);
    }

    #[test]
    fn test_dropping_composite_cancels_all_constituents() {
        let route = Rc::new(UrlRouteSource::from_url("http://localhost/search?query=first").unwrap());
        let store =
            Rc::new(RoutePaginationStore::new(Rc::clone(&route) as Rc<dyn RouteSource>, &SearchConfig::default()));
        let service = SearchStateService::new(Rc::clone(&route) as Rc<dyn RouteSource>, store);

        let options = service.paginated_search_options("spc", &paginated_defaults());
        assert!(route.listener_count() > 0);

        let emissions = Rc::new(Cell::new(0));
        let sub = options.subscribe({
            let emissions = Rc::clone(&emissions);
            move |_| emissions.set(emissions.get() + 1)
        });
        let after_subscribe = emissions.get();

        drop(sub);
        drop(options);
        assert_eq!(route.listener_count(), 0);

        route.navigate("http://localhost/search?query=second").unwrap();
        assert_eq!(emissions.get(), after_subscribe);
    }
}
