//! Search filter model and the frontend filter parameter codec.
//!
//! Filters travel in the URL as `f.<field>[.<operator>]=value` query
//! parameter groups. This module decodes those groups into structured
//! [`SearchFilter`] records and serializes them back for navigation.

use serde::{Deserialize, Serialize};

/// Query parameter key prefix marking a filter group.
pub const FILTER_PREFIX: &str = "f.";

/// Operator assumed when a filter key carries no operator suffix.
pub const DEFAULT_OPERATOR: &str = "query";

/// Operator produced by merging a `.min`/`.max` bound pair.
const RANGE_OPERATOR: &str = "equals";

/// Raw query parameter groups, in URL order.
///
/// Order is significant: [`decode`] emits filters in group order, which is
/// what makes `decode(encode(filters)) == filters` hold exactly.
pub type RawParams = Vec<(String, Vec<String>)>;

/// A single search filter: one field, one operator, one or more values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    pub field: String,
    pub operator: String,
    pub values: Vec<String>,
}

impl SearchFilter {
    /// Create a filter with the default `query` operator.
    pub fn query(field: impl Into<String>, values: Vec<String>) -> Self {
        Self::with_operator(field, DEFAULT_OPERATOR, values)
    }

    /// Create a filter with an explicit operator.
    pub fn with_operator(field: impl Into<String>, operator: impl Into<String>, values: Vec<String>) -> Self {
        SearchFilter { field: field.into(), operator: operator.into(), values }
    }
}

/// Decode raw query parameter groups into filters.
///
/// Keys without the `f.` prefix are ignored. The segment after the last dot
/// is the operator; a key with no extra segment gets [`DEFAULT_OPERATOR`].
/// When both `f.<field>.min` and `f.<field>.max` are present they merge into
/// a single range filter `[<min> TO <max>]` with the `equals` operator; a
/// one-sided bound stays an ordinary filter with operator `min`/`max`.
///
/// Malformed keys (empty field or operator segment) are dropped without
/// failing the rest of the parse.
pub fn decode(raw: &[(String, Vec<String>)]) -> Vec<SearchFilter> {
    let mut filters = Vec::new();
    let mut merged: Vec<String> = Vec::new();

    for (key, values) in raw {
        let Some(rest) = key.strip_prefix(FILTER_PREFIX) else {
            continue;
        };
        if merged.iter().any(|m| m == key) {
            continue;
        }

        let (field, operator) = match rest.rsplit_once('.') {
            Some((field, operator)) => (field, operator),
            None => (rest, DEFAULT_OPERATOR),
        };
        if field.is_empty() || operator.is_empty() {
            tracing::debug!(key = %key, "dropping malformed filter parameter");
            continue;
        }

        if operator == "min" || operator == "max" {
            let other = if operator == "min" { "max" } else { "min" };
            let other_key = format!("{FILTER_PREFIX}{field}.{other}");
            if let Some((_, other_values)) = raw.iter().find(|(k, _)| *k == other_key) {
                let (min, max) = if operator == "min" { (values, other_values) } else { (other_values, values) };
                let low = min.first().map(String::as_str).unwrap_or_default();
                let high = max.first().map(String::as_str).unwrap_or_default();
                filters.push(SearchFilter::with_operator(field, RANGE_OPERATOR, vec![format!("[{low} TO {high}]")]));
                merged.push(other_key);
                continue;
            }
        }

        filters.push(SearchFilter::with_operator(field, operator, values.clone()));
    }

    filters
}

/// Serialize filters back into query parameter groups.
///
/// Inverse of [`decode`] for every filter that did not originate from a
/// `.min`/`.max` pair: the `query` operator encodes as a bare `f.<field>`
/// key, any other operator as `f.<field>.<operator>`.
pub fn encode(filters: &[SearchFilter]) -> RawParams {
    filters
        .iter()
        .map(|filter| {
            let key = if filter.operator == DEFAULT_OPERATOR {
                format!("{FILTER_PREFIX}{}", filter.field)
            } else {
                format!("{FILTER_PREFIX}{}.{}", filter.field, filter.operator)
            };
            (key, filter.values.clone())
        })
        .collect()
}
