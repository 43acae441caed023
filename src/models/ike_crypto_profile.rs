//! IKE crypto profiles

use crate::error::Result;
use crate::resource::model::{check_allowed, check_not_empty, check_range};
use crate::resource::Resource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const HASHES: &[&str] = &["md5", "sha1", "sha256", "sha384", "sha512", "non-auth"];

const ENCRYPTIONS: &[&str] = &[
    "des",
    "3des",
    "aes-128-cbc",
    "aes-192-cbc",
    "aes-256-cbc",
    "aes-128-gcm",
    "aes-256-gcm",
];

const DH_GROUPS: &[&str] = &["group1", "group2", "group5", "group14", "group19", "group20"];

/// IKE phase-1 proposal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IkeCryptoProfile {
    #[serde(default)]
    pub hash: Vec<String>,
    #[serde(default)]
    pub encryption: Vec<String>,
    #[serde(default)]
    pub dh_group: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifetime: Option<IkeLifetime>,
    /// IKEv2 SA reauthentication interval multiplier, 0-50
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_multiple: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Key lifetime; exactly one unit on the wire, e.g. `{"hours": 8}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IkeLifetime {
    Seconds(u32),
    Minutes(u32),
    Hours(u32),
    Days(u32),
}

impl IkeLifetime {
    fn validate(&self) -> Result<()> {
        match *self {
            IkeLifetime::Seconds(v) => check_range("lifetime.seconds", v, 180, 65535),
            IkeLifetime::Minutes(v) => check_range("lifetime.minutes", v, 3, 65535),
            IkeLifetime::Hours(v) => check_range("lifetime.hours", v, 1, 65535),
            IkeLifetime::Days(v) => check_range("lifetime.days", v, 1, 365),
        }
    }
}

impl IkeCryptoProfile {
    pub fn new<S: Into<String>>(
        hash: impl IntoIterator<Item = S>,
        encryption: impl IntoIterator<Item = S>,
        dh_group: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            hash: hash.into_iter().map(Into::into).collect(),
            encryption: encryption.into_iter().map(Into::into).collect(),
            dh_group: dh_group.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_lifetime(mut self, lifetime: IkeLifetime) -> Self {
        self.lifetime = Some(lifetime);
        self
    }
}

impl Resource for IkeCryptoProfile {
    const KIND: &'static str = "ike-crypto-profiles";

    fn validate(&self) -> Result<()> {
        check_not_empty("hash", &self.hash)?;
        check_not_empty("encryption", &self.encryption)?;
        check_not_empty("dh_group", &self.dh_group)?;
        check_allowed("hash", &self.hash, HASHES)?;
        check_allowed("encryption", &self.encryption, ENCRYPTIONS)?;
        check_allowed("dh_group", &self.dh_group, DH_GROUPS)?;

        if let Some(lifetime) = &self.lifetime {
            lifetime.validate()?;
        }
        if let Some(multiple) = self.authentication_multiple {
            check_range("authentication_multiple", multiple, 0, 50)?;
        }
        Ok(())
    }
}
