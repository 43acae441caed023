//! scm-sdk - Client SDK for Strata Cloud Manager network configuration
//!
//! Typed create/read/update/delete, lookup-by-name and filtered listing for
//! container-scoped network objects (zones, IPsec tunnels, IKE crypto
//! profiles and friends), plus commits and job status.
//!
//! Every object lives in exactly one container: a folder, a snippet or a
//! device. Listing walks the API page by page and then narrows the result
//! on the client side.
//!
//! # Example
//!
//! ```ignore
//! use scm_sdk::{Config, ListQuery, NewObject, Scm};
//! use scm_sdk::models::SecurityZone;
//!
//! async fn example() -> scm_sdk::Result<()> {
//!     let scm = Scm::from_config(&Config::load())?;
//!
//!     let zone = scm
//!         .security_zone
//!         .create(&NewObject::new("trust", SecurityZone::default()).in_folder("Texas"))
//!         .await?;
//!
//!     let zones = scm.security_zone.list(&ListQuery::folder("Texas").exact_match()).await?;
//!     assert!(zones.iter().any(|z| z.id == zone.id));
//!
//!     scm.commit(&["Texas".to_string()], "add trust zone", true, 300).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod resource;
pub mod scm;

pub use api::client::ApiClient;
pub use api::jobs::{CommitResult, JobList, JobStatus};
pub use config::Config;
pub use error::{Result, ScmError};
pub use resource::{ConfigObject, ListQuery, Location, NewObject, Resource, ResourceClient};
pub use scm::Scm;
