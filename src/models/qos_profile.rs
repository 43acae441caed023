//! QoS profiles

use crate::error::{Result, ScmError};
use crate::resource::Resource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QosProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate_bandwidth: Option<AggregateBandwidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_bandwidth_type: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Egress limits in Mbps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateBandwidth {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub egress_max: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub egress_guaranteed: Option<u32>,
}

impl Resource for QosProfile {
    const KIND: &'static str = "qos-profiles";

    fn validate(&self) -> Result<()> {
        if let Some(bw) = &self.aggregate_bandwidth {
            if let (Some(max), Some(guaranteed)) = (bw.egress_max, bw.egress_guaranteed) {
                if guaranteed > max {
                    return Err(ScmError::InvalidObject(format!(
                        "egress_guaranteed ({}) exceeds egress_max ({})",
                        guaranteed, max
                    )));
                }
            }
        }
        Ok(())
    }
}
