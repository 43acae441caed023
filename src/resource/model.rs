//! Resource model
//!
//! A resource type is a struct of its type-specific attributes implementing
//! [`Resource`]. The generic envelopes add what every object shares:
//!
//! - [`NewObject`] - create payload: name, container fields, attributes (no id)
//! - [`ConfigObject`] - server-returned object, also the input of updates

use super::location::{ContainerFields, Location};
use crate::error::{Result, ScmError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Longest object name the API accepts
pub const MAX_NAME_LENGTH: usize = 63;

/// Attribute set of one configuration object type
pub trait Resource:
    Serialize + DeserializeOwned + Clone + fmt::Debug + PartialEq + Send + Sync + 'static
{
    /// Registry key of this resource type
    const KIND: &'static str;

    /// Check required fields and value ranges
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Values of a filterable field, or `None` if the object has no value for it.
    ///
    /// The default walks a dot-separated path through the serialized
    /// attributes; list fields yield every scalar element.
    fn filter_values(&self, field: &str) -> Option<Vec<String>> {
        let value = serde_json::to_value(self).ok()?;
        attribute_values(&value, field)
    }
}

/// Create payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "R: Resource")]
pub struct NewObject<R: Resource> {
    pub name: String,
    #[serde(flatten)]
    pub container: ContainerFields,
    #[serde(flatten)]
    pub attributes: R,
}

impl<R: Resource> NewObject<R> {
    pub fn new(name: impl Into<String>, attributes: R) -> Self {
        Self {
            name: name.into(),
            container: ContainerFields::default(),
            attributes,
        }
    }

    pub fn in_folder(mut self, folder: impl Into<String>) -> Self {
        self.container.folder = Some(folder.into());
        self
    }

    pub fn in_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.container.snippet = Some(snippet.into());
        self
    }

    pub fn on_device(mut self, device: impl Into<String>) -> Self {
        self.container.device = Some(device.into());
        self
    }

    pub fn at(mut self, location: &Location) -> Self {
        self.container = ContainerFields::from(location);
        self
    }

    /// Validate name, attributes and container; returns the resolved location
    pub fn validate(&self) -> Result<Location> {
        validate_name(&self.name)?;
        self.attributes.validate()?;
        self.container.resolve()
    }
}

/// A configuration object as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "R: Resource")]
pub struct ConfigObject<R: Resource> {
    pub id: Uuid,
    pub name: String,
    #[serde(flatten)]
    pub container: ContainerFields,
    #[serde(flatten)]
    pub attributes: R,
}

impl<R: Resource> ConfigObject<R> {
    /// Container the object is defined in
    pub fn location(&self) -> Option<Location> {
        self.container.location()
    }

    /// Body of a full-replace update: everything but the id
    pub fn update_body(&self) -> Result<Value> {
        let mut body = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut body {
            map.remove("id");
        }
        Ok(body)
    }

    /// Validate before an update; returns the resolved location
    pub fn validate(&self) -> Result<Location> {
        validate_name(&self.name)?;
        self.attributes.validate()?;
        self.container.resolve()
    }
}

/// Check an object name is usable
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ScmError::InvalidObject("name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ScmError::InvalidObject(format!(
            "name '{}' exceeds {} characters",
            name, MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

/// Helper for attribute range checks
pub(crate) fn check_range(field: &str, value: u32, min: u32, max: u32) -> Result<()> {
    if value < min || value > max {
        return Err(ScmError::InvalidObject(format!(
            "{} must be between {} and {}, got {}",
            field, min, max, value
        )));
    }
    Ok(())
}

/// Helper for required list attributes
pub(crate) fn check_not_empty<T>(field: &str, values: &[T]) -> Result<()> {
    if values.is_empty() {
        return Err(ScmError::InvalidObject(format!("{} is required", field)));
    }
    Ok(())
}

/// Helper for enumerated string attributes
pub(crate) fn check_allowed(field: &str, values: &[String], allowed: &[&str]) -> Result<()> {
    for value in values {
        if !allowed.contains(&value.as_str()) {
            return Err(ScmError::InvalidObject(format!(
                "invalid {} '{}', expected one of: {}",
                field,
                value,
                allowed.join(", ")
            )));
        }
    }
    Ok(())
}

/// Collect the scalar values at a dot-separated path
pub fn attribute_values(item: &Value, path: &str) -> Option<Vec<String>> {
    let mut current = item;
    for part in path.split('.') {
        current = match part.parse::<usize>() {
            Ok(idx) => current.get(idx)?,
            Err(_) => current.get(part)?,
        };
    }

    match current {
        Value::Array(arr) => Some(arr.iter().filter_map(scalar_to_string).collect()),
        other => scalar_to_string(other).map(|s| vec![s]),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        // Named references such as `[{"name": "gw-1"}]`
        Value::Object(map) => map.get("name").and_then(|v| v.as_str()).map(String::from),
        _ => None,
    }
}
