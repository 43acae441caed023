//! Tunnel interfaces

use crate::error::Result;
use crate::resource::model::check_range;
use crate::resource::Resource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TunnelInterface {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ip: Vec<IpEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_management_profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Address in CIDR form, e.g. `{"name": "10.0.0.1/30"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpEntry {
    pub name: String,
}

impl Resource for TunnelInterface {
    const KIND: &'static str = "tunnel-interfaces";

    fn validate(&self) -> Result<()> {
        if let Some(mtu) = self.mtu {
            check_range("mtu", mtu, 576, 9216)?;
        }
        Ok(())
    }
}
