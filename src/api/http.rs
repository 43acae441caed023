//! HTTP transport for the Strata Cloud Manager REST API

use super::auth::Credentials;
use super::transport::{ApiRequest, ApiResponse, Method, Transport};
use crate::error::{Result, ScmError};
use futures::future::BoxFuture;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.strata.paloaltonetworks.com";

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// reqwest-backed transport with bearer authentication
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    credentials: Credentials,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self> {
        Self::with_timeout(base_url, credentials, Duration::from_secs(60))
    }

    /// Create a new HTTP transport with a per-request timeout
    pub fn with_timeout(base_url: &str, credentials: Credentials, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("scm-sdk/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ScmError::Config(format!("failed to create HTTP client: {}", e)))?;

        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ScmError::Config(format!("not a base URL: {}", base_url)));
        }

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the absolute URL for a request path and query
    fn url_for(&self, request: &ApiRequest) -> Result<Url> {
        let mut url = self.base_url.join(request.path.trim_start_matches('/'))?;
        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request)?;
        let token = self.credentials.get_token().await?;

        tracing::debug!("{} {}", request.method, url);

        let builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
            Method::Delete => self.client.delete(url),
        };

        let mut builder = builder.bearer_auth(&token);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        if !(200..300).contains(&status) {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&text));
        }

        // Handle empty response
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(_) if !(200..300).contains(&status) => Value::String(sanitize_for_log(&text)),
                Err(e) => return Err(ScmError::Serialization(format!(
                    "failed to parse response JSON: {}",
                    e
                ))),
            }
        };

        Ok(ApiResponse::new(status, body))
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse>> {
        Box::pin(self.execute(request))
    }
}
