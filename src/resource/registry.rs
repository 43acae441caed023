//! Resource Registry - Load resource definitions from JSON
//!
//! Endpoint, filterable fields and display columns of every resource type
//! come from embedded JSON, so the CLI and the typed clients agree on them.

use crate::api::client::config_path;
use crate::error::{Result, ScmError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[include_str!("../resources/network.json")];

/// Column definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDef {
    pub header: String,
    pub json_path: String,
    pub width: u16,
}

/// Resource definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDef {
    pub display_name: String,
    pub service: String,
    /// Collection path below `/config/{service}/v1/`
    pub path: String,
    /// Fields accepted by client-side resource filters
    #[serde(default)]
    pub filters: Vec<String>,
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
}

impl ResourceDef {
    /// Collection endpoint, e.g. `/config/network/v1/zones`
    pub fn endpoint(&self) -> String {
        config_path(&self.service, &self.path)
    }

    pub fn supports_filter(&self, field: &str) -> bool {
        self.filters.iter().any(|f| f == field)
    }
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceDef>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ResourceConfig> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ResourceConfig {
    REGISTRY.get_or_init(|| {
        let mut final_config = ResourceConfig {
            resources: BTreeMap::new(),
        };

        for content in RESOURCE_FILES {
            let partial: ResourceConfig = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            final_config.resources.extend(partial.resources);
        }

        final_config
    })
}

/// Get a resource definition by key
pub fn get_resource(key: &str) -> Option<&'static ResourceDef> {
    get_registry().resources.get(key)
}

/// Get a resource definition by key, as an error when absent
pub fn require_resource(key: &str) -> Result<&'static ResourceDef> {
    get_resource(key).ok_or_else(|| ScmError::UnknownResource(key.to_string()))
}

/// Get all resource keys, sorted
pub fn get_all_resource_keys() -> Vec<&'static str> {
    get_registry()
        .resources
        .keys()
        .map(|s| s.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;
    use crate::resource::Resource;

    #[test]
    fn test_registry_loads_successfully() {
        let registry = get_registry();
        assert_eq!(registry.resources.len(), 8);
    }

    #[test]
    fn test_every_model_has_a_definition() {
        for kind in [
            BgpAuthProfile::KIND,
            DnsProxy::KIND,
            IkeCryptoProfile::KIND,
            IpsecTunnel::KIND,
            QosProfile::KIND,
            SecurityZone::KIND,
            TunnelInterface::KIND,
            ZoneProtectionProfile::KIND,
        ] {
            assert!(get_resource(kind).is_some(), "missing registry entry for {}", kind);
        }
    }

    #[test]
    fn test_zone_definition() {
        let zones = get_resource("zones").unwrap();
        assert_eq!(zones.display_name, "Security Zones");
        assert_eq!(zones.endpoint(), "/config/network/v1/zones");
        assert!(zones.supports_filter("mode"));
        assert!(!zones.supports_filter("mtu"));
    }

    #[test]
    fn test_columns_start_with_name() {
        for def in get_registry().resources.values() {
            assert_eq!(def.columns.first().map(|c| c.json_path.as_str()), Some("name"));
        }
    }

    #[test]
    fn test_unknown_resource() {
        assert!(matches!(
            require_resource("address-objects"),
            Err(ScmError::UnknownResource(_))
        ));
    }
}
