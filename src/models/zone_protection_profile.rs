//! Zone protection profiles

use crate::error::{Result, ScmError};
use crate::resource::Resource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const MAX_DESCRIPTION_LENGTH: usize = 255;

/// Flood, reconnaissance and packet-based attack protection settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneProtectionProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flood: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource for ZoneProtectionProfile {
    const KIND: &'static str = "zone-protection-profiles";

    fn validate(&self) -> Result<()> {
        if let Some(description) = &self.description {
            if description.chars().count() > MAX_DESCRIPTION_LENGTH {
                return Err(ScmError::InvalidObject(format!(
                    "description exceeds {} characters",
                    MAX_DESCRIPTION_LENGTH
                )));
            }
        }
        Ok(())
    }
}
