//! Client-side result filtering
//!
//! Applied after every page has been retrieved. Rules run in order:
//! exact match on the queried container, container exclusions, then
//! resource-specific field filters. Relative order is preserved.

use super::model::{ConfigObject, Resource};
use super::query::ListQuery;

/// Filter listed objects against a query
pub fn apply<R: Resource>(objects: Vec<ConfigObject<R>>, query: &ListQuery) -> Vec<ConfigObject<R>> {
    if !query.has_post_filters() {
        return objects;
    }

    let before = objects.len();
    let kept: Vec<_> = objects.into_iter().filter(|o| matches(o, query)).collect();

    tracing::debug!("Filtered {} -> {} {}", before, kept.len(), R::KIND);
    kept
}

/// True when `object` survives every filter of `query`
pub fn matches<R: Resource>(object: &ConfigObject<R>, query: &ListQuery) -> bool {
    if query.exact_match {
        if let Some(container) = &query.container {
            if object.location().as_ref() != Some(container) {
                return false;
            }
        }
    }

    if is_excluded(object.container.folder.as_deref(), &query.exclude_folders)
        || is_excluded(object.container.snippet.as_deref(), &query.exclude_snippets)
        || is_excluded(object.container.device.as_deref(), &query.exclude_devices)
    {
        return false;
    }

    query.filters.iter().all(|filter| {
        if filter.values.is_empty() {
            return true;
        }
        object
            .attributes
            .filter_values(&filter.field)
            .map(|values| values.iter().any(|v| filter.values.contains(v)))
            .unwrap_or(false)
    })
}

fn is_excluded(value: Option<&str>, excluded: &[String]) -> bool {
    match value {
        Some(v) => excluded.iter().any(|e| e == v),
        None => false,
    }
}
