//! List queries

use super::location::Location;

/// Filter on a resource-specific field
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceFilter {
    pub field: String,
    pub values: Vec<String>,
}

impl ResourceFilter {
    pub fn new(field: &str, values: Vec<String>) -> Self {
        Self {
            field: field.to_string(),
            values,
        }
    }
}

/// Parameters of a `list` call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    /// Container to list; required by `list`
    pub container: Option<Location>,
    /// Keep only objects defined directly in `container`, dropping inherited ones
    pub exact_match: bool,
    pub exclude_folders: Vec<String>,
    pub exclude_snippets: Vec<String>,
    pub exclude_devices: Vec<String>,
    pub filters: Vec<ResourceFilter>,
    /// Page size for this call only, overriding the client's `max_limit`
    pub max_limit: Option<i64>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_location(location: Location) -> Self {
        Self {
            container: Some(location),
            ..Self::default()
        }
    }

    pub fn folder(name: impl Into<String>) -> Self {
        Self::in_location(Location::folder(name))
    }

    pub fn snippet(name: impl Into<String>) -> Self {
        Self::in_location(Location::snippet(name))
    }

    pub fn device(name: impl Into<String>) -> Self {
        Self::in_location(Location::device(name))
    }

    pub fn exact_match(mut self) -> Self {
        self.exact_match = true;
        self
    }

    pub fn exclude_folder(mut self, name: impl Into<String>) -> Self {
        self.exclude_folders.push(name.into());
        self
    }

    pub fn exclude_snippet(mut self, name: impl Into<String>) -> Self {
        self.exclude_snippets.push(name.into());
        self
    }

    pub fn exclude_device(mut self, name: impl Into<String>) -> Self {
        self.exclude_devices.push(name.into());
        self
    }

    pub fn filter<I, S>(mut self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.push(ResourceFilter::new(
            field,
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn max_limit(mut self, limit: i64) -> Self {
        self.max_limit = Some(limit);
        self
    }

    /// True when any client-side filtering applies
    pub fn has_post_filters(&self) -> bool {
        self.exact_match
            || !self.exclude_folders.is_empty()
            || !self.exclude_snippets.is_empty()
            || !self.exclude_devices.is_empty()
            || !self.filters.is_empty()
    }
}
