//! DNS proxies

use crate::error::{Result, ScmError};
use crate::resource::model::check_range;
use crate::resource::Resource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// DNS proxy object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DnsProxy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Default upstream servers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DnsProxyDefault>,
    /// Interfaces the proxy listens on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interface: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<DnsProxyCache>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DnsProxyDefault {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inheritance: Option<Value>,
    pub primary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DnsProxyCache {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_edns: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_ttl: Option<MaxTtl>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaxTtl {
    #[serde(default)]
    pub enabled: bool,
    /// Seconds, 60-86400
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_live: Option<u32>,
}

impl Resource for DnsProxy {
    const KIND: &'static str = "dns-proxies";

    fn validate(&self) -> Result<()> {
        if let Some(default) = &self.default {
            if default.primary.trim().is_empty() {
                return Err(ScmError::InvalidObject(
                    "default.primary is required".to_string(),
                ));
            }
        }
        if let Some(ttl) = self.cache.as_ref().and_then(|c| c.max_ttl.as_ref()) {
            if let Some(seconds) = ttl.time_to_live {
                check_range("cache.max_ttl.time_to_live", seconds, 60, 86400)?;
            }
        }
        Ok(())
    }
}
