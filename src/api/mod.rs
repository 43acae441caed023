//! API interaction module
//!
//! Everything that touches the wire: the transport seam, the HTTP and
//! in-memory transports, token handling, and the commit/job endpoints.
//!
//! # Module Structure
//!
//! - [`transport`] - Request/response types and the [`transport::Transport`] trait
//! - [`http`] - reqwest-backed transport
//! - [`memory`] - In-process fake of the configuration API
//! - [`auth`] - Token providers with expiry-aware caching
//! - [`client`] - Status-to-error mapping shared by all services
//! - [`jobs`] - Commits and job status
//!
//! # Example
//!
//! ```ignore
//! use scm_sdk::api::{auth::Credentials, client::ApiClient};
//!
//! async fn example() -> scm_sdk::Result<()> {
//!     let api = ApiClient::http("https://api.strata.paloaltonetworks.com", Credentials::from_token("..."))?;
//!     let zones = api.get("/config/network/v1/zones", &[("folder", "Texas".to_string())]).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
pub mod jobs;
pub mod memory;
pub mod transport;
