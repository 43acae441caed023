//! IPsec tunnels

use crate::error::{Result, ScmError};
use crate::resource::model::check_not_empty;
use crate::resource::Resource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// IPsec tunnel object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IpsecTunnel {
    #[serde(default)]
    pub auto_key: AutoKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anti_replay: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_tos: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_gre_encapsulation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tunnel_monitor: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Auto-keyed tunnel settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutoKey {
    #[serde(default)]
    pub ike_gateway: Vec<NamedRef>,
    #[serde(default)]
    pub ipsec_crypto_profile: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reference to another object by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

impl NamedRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl IpsecTunnel {
    pub fn new(ike_gateway: impl Into<String>, ipsec_crypto_profile: impl Into<String>) -> Self {
        Self {
            auto_key: AutoKey {
                ike_gateway: vec![NamedRef::new(ike_gateway)],
                ipsec_crypto_profile: ipsec_crypto_profile.into(),
                extra: Map::new(),
            },
            ..Self::default()
        }
    }
}

impl Resource for IpsecTunnel {
    const KIND: &'static str = "ipsec-tunnels";

    fn validate(&self) -> Result<()> {
        check_not_empty("auto_key.ike_gateway", &self.auto_key.ike_gateway)?;
        if self.auto_key.ike_gateway.iter().any(|g| g.name.trim().is_empty()) {
            return Err(ScmError::InvalidObject(
                "auto_key.ike_gateway entries need a name".to_string(),
            ));
        }
        if self.auto_key.ipsec_crypto_profile.trim().is_empty() {
            return Err(ScmError::InvalidObject(
                "auto_key.ipsec_crypto_profile is required".to_string(),
            ));
        }
        Ok(())
    }
}
