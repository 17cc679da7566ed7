//! Route query-parameter source.
//!
//! [`RouteSource`] is the read-only seam the search state derives from.
//! [`UrlRouteSource`] implements it over the current location, fed by the
//! application's router through [`UrlRouteSource::navigate`].

use folio_core::RawParams;

use crate::signal::{Signal, ValueStream};

/// Read-only access to the current route's query parameters.
pub trait RouteSource {
    /// Latest first value of one query parameter, `None` while absent.
    fn query_parameter(&self, name: &str) -> ValueStream<Option<String>>;

    /// Latest values of every parameter whose key starts with `prefix`,
    /// grouped per key in URL order.
    fn query_parameters_with_prefix(&self, prefix: &str) -> ValueStream<RawParams>;
}

/// Errors from feeding the route source.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Query parameters of the current location, kept live across navigations.
pub struct UrlRouteSource {
    params: Signal<RawParams>,
}

impl Default for UrlRouteSource {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlRouteSource {
    /// Start with no query parameters.
    pub fn new() -> Self {
        UrlRouteSource { params: Signal::new(Vec::new()) }
    }

    /// Start from a full URL.
    pub fn from_url(url: &str) -> Result<Self, RouteError> {
        let source = Self::new();
        source.navigate(url)?;
        Ok(source)
    }

    /// Replace the current location, re-emitting every derived stream.
    pub fn navigate(&self, url: &str) -> Result<(), RouteError> {
        let parsed = url::Url::parse(url)?;
        let params = group_pairs(parsed.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())));
        tracing::debug!(url, groups = params.len(), "route changed");
        self.params.set(params);
        Ok(())
    }

    /// Number of live listeners on the parameter set, for leak checks.
    pub fn listener_count(&self) -> usize {
        self.params.subscriber_count()
    }
}

/// Group repeated keys into one entry each, in first-seen order.
fn group_pairs(pairs: impl Iterator<Item = (String, String)>) -> RawParams {
    let mut grouped: RawParams = Vec::new();
    for (key, value) in pairs {
        match grouped.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => grouped.push((key, vec![value])),
        }
    }
    grouped
}

impl RouteSource for UrlRouteSource {
    fn query_parameter(&self, name: &str) -> ValueStream<Option<String>> {
        let name = name.to_string();
        ValueStream::source(self.params.clone())
            .map(move |params| params.iter().find(|(k, _)| *k == name).and_then(|(_, values)| values.first().cloned()))
    }

    fn query_parameters_with_prefix(&self, prefix: &str) -> ValueStream<RawParams> {
        let prefix = prefix.to_string();
        ValueStream::source(self.params.clone())
            .map(move |params| params.iter().filter(|(k, _)| k.starts_with(&prefix)).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_parameter() {
        let source = UrlRouteSource::from_url("http://localhost/search?scope=123&query=test").unwrap();
        assert_eq!(source.query_parameter("scope").get(), Some("123".to_string()));
        assert_eq!(source.query_parameter("query").get(), Some("test".to_string()));
        assert_eq!(source.query_parameter("configuration").get(), None);
    }

    #[test]
    fn test_query_parameter_first_value_wins() {
        let source = UrlRouteSource::from_url("http://localhost/?scope=a&scope=b").unwrap();
        assert_eq!(source.query_parameter("scope").get(), Some("a".to_string()));
    }

    #[test]
    fn test_prefix_groups_repeated_keys() {
        let source = UrlRouteSource::from_url("http://localhost/?f.author=jane&f.author=joan&f.subject=art&query=x").unwrap();
        let filters = source.query_parameters_with_prefix("f.");
        assert_eq!(
            filters.get(),
            vec![
                ("f.author".to_string(), vec!["jane".to_string(), "joan".to_string()]),
                ("f.subject".to_string(), vec!["art".to_string()]),
            ]
        );
    }

    #[test]
    fn test_navigation_re_emits() {
        let source = UrlRouteSource::from_url("http://localhost/?scope=1").unwrap();
        let scope = source.query_parameter("scope");
        assert_eq!(scope.get(), Some("1".to_string()));
        source.navigate("http://localhost/?scope=2").unwrap();
        assert_eq!(scope.get(), Some("2".to_string()));
        source.navigate("http://localhost/").unwrap();
        assert_eq!(scope.get(), None);
    }

    #[test]
    fn test_invalid_url_is_an_error() {
        let source = UrlRouteSource::new();
        assert!(matches!(source.navigate("::notaurl"), Err(RouteError::InvalidUrl(_))));
    }

    #[test]
    fn test_listener_count_tracks_streams() {
        let source = UrlRouteSource::new();
        assert_eq!(source.listener_count(), 0);
        let scope = source.query_parameter("scope");
        let filters = source.query_parameters_with_prefix("f.");
        assert_eq!(source.listener_count(), 2);
        drop(scope);
        drop(filters);
        assert_eq!(source.listener_count(), 0);
    }

    #[test]
    fn test_url_decoding() {
        let source = UrlRouteSource::from_url("http://localhost/?query=hello%20world").unwrap();
        assert_eq!(source.query_parameter("query").get(), Some("hello world".to_string()));
    }
}
