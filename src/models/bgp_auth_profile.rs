//! BGP authentication profiles

use crate::error::{Result, ScmError};
use crate::resource::Resource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Shared secret used to authenticate BGP peers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BgpAuthProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BgpAuthProfile {
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            ..Self::default()
        }
    }
}

impl Resource for BgpAuthProfile {
    const KIND: &'static str = "bgp-auth-profiles";

    fn validate(&self) -> Result<()> {
        if matches!(self.secret.as_deref(), Some(s) if s.is_empty()) {
            return Err(ScmError::InvalidObject("secret must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_secret_rejected() {
        assert!(BgpAuthProfile::with_secret("").validate().is_err());
        assert!(BgpAuthProfile::with_secret("s3cret").validate().is_ok());
        assert!(BgpAuthProfile::default().validate().is_ok());
    }
}
