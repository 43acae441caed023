//! CRUD client
//!
//! One [`ResourceClient`] per resource type maps method calls onto requests
//! against the type's collection endpoint. It holds no object state, only the
//! shared API handle and its page size.

use super::filter;
use super::location::Location;
use super::model::{ConfigObject, NewObject, Resource};
use super::paginator::{fetch_all_pages, validate_max_limit, DEFAULT_MAX_LIMIT};
use super::query::ListQuery;
use super::registry::{require_resource, ResourceDef};
use crate::api::client::{object_path, ApiClient};
use crate::error::{Result, ScmError};
use serde_json::Value;
use std::marker::PhantomData;
use uuid::Uuid;

/// Typed client for one resource type
pub struct ResourceClient<R: Resource> {
    api: ApiClient,
    def: &'static ResourceDef,
    endpoint: String,
    max_limit: usize,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            def: self.def,
            endpoint: self.endpoint.clone(),
            max_limit: self.max_limit,
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceClient<R> {
    /// Create a client with the default page size
    pub fn new(api: ApiClient) -> Result<Self> {
        let def = require_resource(R::KIND)?;
        Ok(Self {
            api,
            def,
            endpoint: def.endpoint(),
            max_limit: DEFAULT_MAX_LIMIT,
            _resource: PhantomData,
        })
    }

    /// Builder form of [`Self::set_max_limit`]
    pub fn with_max_limit(mut self, max_limit: i64) -> Result<Self> {
        self.set_max_limit(max_limit)?;
        Ok(self)
    }

    /// Page size used by `list`
    pub fn max_limit(&self) -> usize {
        self.max_limit
    }

    /// Set the page size; values above 5000 are clamped, values below 1 rejected
    pub fn set_max_limit(&mut self, max_limit: i64) -> Result<()> {
        self.max_limit = validate_max_limit(max_limit)?;
        Ok(())
    }

    /// Collection endpoint of this resource type
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Registry definition of this resource type
    pub fn definition(&self) -> &'static ResourceDef {
        self.def
    }

    /// Create a new object
    pub async fn create(&self, data: &NewObject<R>) -> Result<ConfigObject<R>> {
        let location = data.validate()?;

        tracing::info!("Creating {} '{}' in {}", R::KIND, data.name, location);

        let body = serde_json::to_value(data)?;
        let response = self.api.post(&self.endpoint, body).await?;
        parse_object(response)
    }

    /// Get an object by id
    pub async fn get(&self, id: Uuid) -> Result<ConfigObject<R>> {
        let response = self
            .api
            .get(&object_path(&self.endpoint, &id.to_string()), &[])
            .await?;
        parse_object(response)
    }

    /// Replace an existing object
    pub async fn update(&self, object: &ConfigObject<R>) -> Result<ConfigObject<R>> {
        let location = object.validate()?;

        tracing::info!(
            "Updating {} '{}' ({}) in {}",
            R::KIND,
            object.name,
            object.id,
            location
        );

        let body = object.update_body()?;
        let response = self
            .api
            .put(&object_path(&self.endpoint, &object.id.to_string()), body)
            .await?;
        parse_object(response)
    }

    /// Delete an object by id
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        tracing::info!("Deleting {} {}", R::KIND, id);

        self.api
            .delete(&object_path(&self.endpoint, &id.to_string()))
            .await?;
        Ok(())
    }

    /// Look up a single object by name within one container
    pub async fn fetch(&self, name: &str, location: &Location) -> Result<ConfigObject<R>> {
        if name.trim().is_empty() {
            return Err(ScmError::MissingQueryParameter(
                "'name' must be provided".to_string(),
            ));
        }
        if location.name().trim().is_empty() {
            return Err(ScmError::MissingQueryParameter(format!(
                "'{}' must not be empty",
                location.field()
            )));
        }

        let (field, container) = location.query_pair();
        let response = self
            .api
            .get(&self.endpoint, &[("name", name.to_string()), (field, container)])
            .await?;

        let candidates = match response {
            Value::Object(mut map) if map.contains_key("data") => match map.remove("data") {
                Some(Value::Array(arr)) => arr,
                _ => Vec::new(),
            },
            Value::Array(arr) => arr,
            Value::Object(map) => vec![Value::Object(map)],
            _ => Vec::new(),
        };

        let mut matching = candidates
            .into_iter()
            .filter(|item| item.get("name").and_then(|v| v.as_str()) == Some(name));

        let Some(first) = matching.next() else {
            return Err(ScmError::ObjectNotPresent(format!(
                "{} '{}' not found in {}",
                R::KIND,
                name,
                location
            )));
        };

        let extra = matching.count();
        if extra > 0 {
            tracing::warn!(
                "{} objects named '{}' in {}; returning the first",
                extra + 1,
                name,
                location
            );
        }

        parse_object(first)
    }

    /// List every object in a container, then apply client-side filters
    pub async fn list(&self, query: &ListQuery) -> Result<Vec<ConfigObject<R>>> {
        let Some(container) = &query.container else {
            return Err(ScmError::MissingQueryParameter(
                "exactly one of 'folder', 'snippet', or 'device' must be provided".to_string(),
            ));
        };
        if container.name().trim().is_empty() {
            return Err(ScmError::MissingQueryParameter(format!(
                "'{}' must not be empty",
                container.field()
            )));
        }

        for filter in &query.filters {
            if !self.def.supports_filter(&filter.field) {
                return Err(ScmError::InvalidObject(format!(
                    "unsupported filter '{}' for {} (supported: {})",
                    filter.field,
                    R::KIND,
                    if self.def.filters.is_empty() {
                        "none".to_string()
                    } else {
                        self.def.filters.join(", ")
                    }
                )));
            }
        }

        let page_size = match query.max_limit {
            Some(limit) => validate_max_limit(limit)?,
            None => self.max_limit,
        };

        tracing::debug!("Listing {} in {} (page size {})", R::KIND, container, page_size);

        let params = [container.query_pair()];
        let items = fetch_all_pages(&self.api, &self.endpoint, &params, page_size).await?;

        let objects = items
            .into_iter()
            .map(parse_object)
            .collect::<Result<Vec<ConfigObject<R>>>>()?;

        Ok(filter::apply(objects, query))
    }
}

fn parse_object<R: Resource>(value: Value) -> Result<ConfigObject<R>> {
    serde_json::from_value(value).map_err(|e| {
        ScmError::Serialization(format!("failed to parse {} response: {}", R::KIND, e))
    })
}

impl<R: Resource> std::fmt::Debug for ResourceClient<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("kind", &R::KIND)
            .field("endpoint", &self.endpoint)
            .field("max_limit", &self.max_limit)
            .finish()
    }
}

