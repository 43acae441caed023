//! Containers
//!
//! Every configuration object lives in exactly one container: a folder, a
//! snippet or a device. Payloads carry the container as three optional
//! fields; [`ContainerFields::resolve`] enforces the exactly-one rule.

use crate::error::{Result, ScmError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placement scope of a configuration object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    Folder(String),
    Snippet(String),
    Device(String),
}

impl Location {
    pub fn folder(name: impl Into<String>) -> Self {
        Location::Folder(name.into())
    }

    pub fn snippet(name: impl Into<String>) -> Self {
        Location::Snippet(name.into())
    }

    pub fn device(name: impl Into<String>) -> Self {
        Location::Device(name.into())
    }

    /// Wire field name of this container kind
    pub fn field(&self) -> &'static str {
        match self {
            Location::Folder(_) => "folder",
            Location::Snippet(_) => "snippet",
            Location::Device(_) => "device",
        }
    }

    /// Container name
    pub fn name(&self) -> &str {
        match self {
            Location::Folder(name) | Location::Snippet(name) | Location::Device(name) => name,
        }
    }

    /// Query parameter selecting this container in list requests
    pub fn query_pair(&self) -> (&'static str, String) {
        (self.field(), self.name().to_string())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.field(), self.name())
    }
}

/// The three optional container fields as they appear on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

impl ContainerFields {
    /// Resolve to a single location, failing unless exactly one field is set
    pub fn resolve(&self) -> Result<Location> {
        let populated = self.populated();
        match populated.as_slice() {
            [location] => Ok(location.clone()),
            [] => Err(ScmError::InvalidObject(
                "exactly one of 'folder', 'snippet', or 'device' must be provided".to_string(),
            )),
            many => Err(ScmError::InvalidObject(format!(
                "exactly one of 'folder', 'snippet', or 'device' must be provided, got {}",
                many.iter().map(|l| l.field()).collect::<Vec<_>>().join(", ")
            ))),
        }
    }

    /// First populated location, without enforcing cardinality.
    /// Used for server-returned objects.
    pub fn location(&self) -> Option<Location> {
        self.populated().into_iter().next()
    }

    fn populated(&self) -> Vec<Location> {
        let non_empty = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
        };

        let mut out = Vec::new();
        if let Some(name) = non_empty(&self.folder) {
            out.push(Location::Folder(name));
        }
        if let Some(name) = non_empty(&self.snippet) {
            out.push(Location::Snippet(name));
        }
        if let Some(name) = non_empty(&self.device) {
            out.push(Location::Device(name));
        }
        out
    }
}

impl From<&Location> for ContainerFields {
    fn from(location: &Location) -> Self {
        let name = Some(location.name().to_string());
        match location {
            Location::Folder(_) => Self { folder: name, ..Self::default() },
            Location::Snippet(_) => Self { snippet: name, ..Self::default() },
            Location::Device(_) => Self { device: name, ..Self::default() },
        }
    }
}

impl From<Location> for ContainerFields {
    fn from(location: Location) -> Self {
        Self::from(&location)
    }
}
