//! Unified client
//!
//! [`Scm`] bundles one typed client per resource type, all sharing a single
//! [`ApiClient`], plus the commit/job service.

use crate::api::auth::Credentials;
use crate::api::client::ApiClient;
use crate::api::jobs::{CommitResult, JobList, JobService, JobStatus};
use crate::api::transport::Transport;
use crate::config::Config;
use crate::error::Result;
use crate::models::*;
use crate::resource::ResourceClient;
use std::sync::Arc;

/// Entry point to the SDK
#[derive(Clone)]
pub struct Scm {
    pub bgp_auth_profile: ResourceClient<BgpAuthProfile>,
    pub dns_proxy: ResourceClient<DnsProxy>,
    pub ike_crypto_profile: ResourceClient<IkeCryptoProfile>,
    pub ipsec_tunnel: ResourceClient<IpsecTunnel>,
    pub qos_profile: ResourceClient<QosProfile>,
    pub security_zone: ResourceClient<SecurityZone>,
    pub tunnel_interface: ResourceClient<TunnelInterface>,
    pub zone_protection_profile: ResourceClient<ZoneProtectionProfile>,
    pub jobs: JobService,
}

impl Scm {
    /// Build every service over one API client
    pub fn new(api: ApiClient) -> Result<Self> {
        Ok(Self {
            bgp_auth_profile: ResourceClient::new(api.clone())?,
            dns_proxy: ResourceClient::new(api.clone())?,
            ike_crypto_profile: ResourceClient::new(api.clone())?,
            ipsec_tunnel: ResourceClient::new(api.clone())?,
            qos_profile: ResourceClient::new(api.clone())?,
            security_zone: ResourceClient::new(api.clone())?,
            tunnel_interface: ResourceClient::new(api.clone())?,
            zone_protection_profile: ResourceClient::new(api.clone())?,
            jobs: JobService::new(api),
        })
    }

    /// Build over any transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Result<Self> {
        Self::new(ApiClient::new(transport))
    }

    /// Build an HTTP client from configuration; the token is read from the
    /// configured environment variable
    pub fn from_config(config: &Config) -> Result<Self> {
        let credentials = config.credentials()?;
        Self::with_credentials(config, credentials)
    }

    /// Build an HTTP client from configuration with explicit credentials
    pub fn with_credentials(config: &Config, credentials: Credentials) -> Result<Self> {
        let api = ApiClient::http(&config.effective_base_url(), credentials)?;
        let mut scm = Self::new(api)?;
        if let Some(limit) = config.max_limit {
            scm.set_max_limit(limit)?;
        }
        Ok(scm)
    }

    /// Poll interval used by synchronous commits
    pub fn with_poll_interval(mut self, interval: std::time::Duration) -> Self {
        self.jobs = self.jobs.with_poll_interval(interval);
        self
    }

    /// Set the page size of every resource client
    pub fn set_max_limit(&mut self, max_limit: i64) -> Result<()> {
        self.bgp_auth_profile.set_max_limit(max_limit)?;
        self.dns_proxy.set_max_limit(max_limit)?;
        self.ike_crypto_profile.set_max_limit(max_limit)?;
        self.ipsec_tunnel.set_max_limit(max_limit)?;
        self.qos_profile.set_max_limit(max_limit)?;
        self.security_zone.set_max_limit(max_limit)?;
        self.tunnel_interface.set_max_limit(max_limit)?;
        self.zone_protection_profile.set_max_limit(max_limit)?;
        Ok(())
    }

    /// Push staged configuration of `folders`
    pub async fn commit(
        &self,
        folders: &[String],
        description: &str,
        sync: bool,
        timeout: u64,
    ) -> Result<CommitResult> {
        self.jobs.commit(folders, description, sync, timeout).await
    }

    pub async fn get_job_status(&self, job_id: &str) -> Result<JobStatus> {
        self.jobs.get_job_status(job_id).await
    }

    pub async fn list_jobs(&self, limit: usize) -> Result<JobList> {
        self.jobs.list_jobs(limit).await
    }
}
