//! API Client
//!
//! Shared handle over a [`Transport`] that turns raw responses into either a
//! JSON value or a typed [`ScmError`]. Every resource client and the job
//! service hold a clone of the same `ApiClient`.

use super::auth::Credentials;
use super::http::HttpTransport;
use super::transport::{ApiRequest, Transport};
use crate::error::{Result, ScmError};
use serde_json::Value;
use std::sync::Arc;

/// Main API client
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Create a client speaking HTTP to `base_url` with the given credentials
    pub fn http(base_url: &str, credentials: Credentials) -> Result<Self> {
        let transport = HttpTransport::new(base_url, credentials)?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// Send a request and map non-success statuses onto the error taxonomy
    pub async fn send(&self, request: ApiRequest) -> Result<Value> {
        let method = request.method;
        let path = request.path.clone();

        let response = self.transport.send(request).await?;

        if response.is_success() {
            return Ok(response.body);
        }

        let err = ScmError::from_response(response.status, &response.body);
        tracing::debug!("{} {} failed: {}", method, path, err);
        Err(err)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let mut request = ApiRequest::get(path);
        for (key, value) in query {
            request = request.with_query(key, value);
        }
        self.send(request).await
    }

    /// Make a POST request
    pub async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.send(ApiRequest::post(path).with_body(body)).await
    }

    /// Make a PUT request
    pub async fn put(&self, path: &str, body: Value) -> Result<Value> {
        self.send(ApiRequest::put(path).with_body(body)).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.send(ApiRequest::delete(path)).await
    }
}

// =========================================================================
// Path helpers
// =========================================================================

/// Build a configuration service path, e.g. `config_path("network", "zones")`
pub fn config_path(service: &str, resource: &str) -> String {
    format!("/config/{}/v1/{}", service, resource)
}

/// Build the path of a single object under a collection endpoint
pub fn object_path(endpoint: &str, id: &str) -> String {
    format!("{}/{}", endpoint.trim_end_matches('/'), urlencoding::encode(id))
}

/// Build an operations service path, e.g. `operations_path("jobs")`
pub fn operations_path(resource: &str) -> String {
    config_path("operations", resource)
}
