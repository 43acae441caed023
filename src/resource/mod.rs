//! Resource abstraction layer
//!
//! Generic machinery shared by every configuration object type.
//!
//! # Architecture
//!
//! - [`location`] - Container model and the exactly-one-container rule
//! - [`model`] - The [`Resource`] trait and the create/response envelopes
//! - [`registry`] - Endpoints, filter fields and columns from embedded JSON
//! - [`paginator`] - Offset/limit walk over collection endpoints
//! - [`filter`] - Client-side post-filtering of list results
//! - [`client`] - Typed CRUD client per resource type
//!
//! # Example
//!
//! ```ignore
//! use scm_sdk::resource::{ListQuery, ResourceClient};
//! use scm_sdk::models::SecurityZone;
//!
//! async fn layer3_zones(client: &ResourceClient<SecurityZone>) -> scm_sdk::Result<usize> {
//!     let zones = client
//!         .list(&ListQuery::folder("Texas").exact_match().filter("mode", ["layer3"]))
//!         .await?;
//!     Ok(zones.len())
//! }
//! ```

pub mod client;
pub mod filter;
pub mod location;
pub mod model;
pub mod paginator;
pub mod query;
pub mod registry;

pub use client::ResourceClient;
pub use location::{ContainerFields, Location};
pub use model::{ConfigObject, NewObject, Resource};
pub use paginator::{DEFAULT_MAX_LIMIT, MAX_PAGE_SIZE};
pub use query::{ListQuery, ResourceFilter};
pub use registry::{get_all_resource_keys, get_resource, ColumnDef, ResourceDef};
