//! Security zones

use crate::error::{Result, ScmError};
use crate::resource::Resource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Security zone object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityZone {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_user_identification: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_device_identification: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dos_profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dos_log_setting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<ZoneNetwork>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_acl: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_acl: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Interfaces bound to the zone; at most one mode may be set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneNetwork {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer2: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer3: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_wire: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tap: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tunnel: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_protection_profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_packet_buffer_protection: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_setting: Option<String>,
}

impl ZoneNetwork {
    /// Names of the populated modes
    pub fn modes(&self) -> Vec<&'static str> {
        let mut modes = Vec::new();
        if self.layer2.is_some() {
            modes.push("layer2");
        }
        if self.layer3.is_some() {
            modes.push("layer3");
        }
        if self.virtual_wire.is_some() {
            modes.push("virtual_wire");
        }
        if self.tap.is_some() {
            modes.push("tap");
        }
        if self.external.is_some() {
            modes.push("external");
        }
        if self.tunnel.is_some() {
            modes.push("tunnel");
        }
        modes
    }
}

impl SecurityZone {
    /// Zone mode, derived from which interface list is set
    pub fn mode(&self) -> Option<&'static str> {
        self.network.as_ref()?.modes().first().copied()
    }
}

impl Resource for SecurityZone {
    const KIND: &'static str = "zones";

    fn validate(&self) -> Result<()> {
        if let Some(network) = &self.network {
            let modes = network.modes();
            if modes.len() > 1 {
                return Err(ScmError::InvalidObject(format!(
                    "only one network mode may be set, got {}",
                    modes.join(", ")
                )));
            }
        }
        Ok(())
    }

    fn filter_values(&self, field: &str) -> Option<Vec<String>> {
        match field {
            "mode" => self.mode().map(|m| vec![m.to_string()]),
            "enable_user_identification" => self
                .enable_user_identification
                .map(|v| vec![v.to_string()]),
            _ => None,
        }
    }
}
