//! Live search-state derivation for folio.
//!
//! This crate derives the current search request (query, scope, filters,
//! sort, pagination, object type) from the browser location, keeps it
//! current as the URL changes, and rebases cache staleness timestamps after
//! the application state is rehydrated from a server-rendered snapshot.

pub mod pagination;
pub mod rehydrate;
pub mod route;
pub mod service;
pub mod signal;

pub use pagination::{PaginationSource, RoutePaginationStore};
pub use rehydrate::{CacheResetPort, CacheTimestampReset, Clock, ReactorState, RehydrationReactor, SystemClock};
pub use route::{RouteError, RouteSource, UrlRouteSource};
pub use service::SearchStateService;
pub use signal::{Signal, Subscription, ValueStream};
