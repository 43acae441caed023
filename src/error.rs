//! Error taxonomy
//!
//! Every fallible library call returns [`ScmError`]. Validation failures
//! (`InvalidObject`, `MissingQueryParameter`) are raised locally before any
//! request is sent; the remaining kinds are mapped from API responses by
//! [`ScmError::from_response`] and surfaced as-is.

use serde_json::Value;
use thiserror::Error;

/// Result type using ScmError
pub type Result<T> = std::result::Result<T, ScmError>;

/// Errors raised by the SDK
#[derive(Debug, Error)]
pub enum ScmError {
    /// Malformed payload, wrong container cardinality or invalid `max_limit`
    #[error("invalid object: {0}")]
    InvalidObject(String),

    /// A required query parameter (name or container) was omitted
    #[error("missing query parameter: {0}")]
    MissingQueryParameter(String),

    /// An object with the same name already exists in the container
    #[error("name not unique: {0}")]
    NameNotUnique(String),

    /// The target object does not exist
    #[error("object not present: {0}")]
    ObjectNotPresent(String),

    /// The object is still referenced by other objects
    #[error("reference not zero: {0}")]
    ReferenceNotZero(String),

    /// Credentials or token were rejected
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Server-side failure (5xx)
    #[error("server error [{status}]: {message}")]
    Server { status: u16, message: String },

    /// Any other non-success status
    #[error("API error [{status}]: {message}")]
    Api { status: u16, message: String },

    /// The request never produced a response
    #[error("transport error: {0}")]
    Transport(String),

    /// A body could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A job did not finish within the allotted time
    #[error("timed out after {0}s waiting for job")]
    Timeout(u64),

    /// The resource kind has no registry entry
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    /// Invalid or incomplete client configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl ScmError {
    /// Map a non-success API response onto the error taxonomy.
    ///
    /// The API reports failures as
    /// `{"_errors": [{"code": "...", "message": "...", "details": {"errorType": "..."}}]}`.
    /// The error type disambiguates statuses shared by several kinds (400, 409).
    pub fn from_response(status: u16, body: &Value) -> Self {
        let message = error_message(body).unwrap_or_else(|| format!("HTTP {}", status));
        let error_type = error_type(body).unwrap_or_default();

        match status {
            400 if error_type == "Missing Query Parameter" => {
                ScmError::MissingQueryParameter(message)
            },
            400 => ScmError::InvalidObject(message),
            401 | 403 => ScmError::Authentication(message),
            404 => ScmError::ObjectNotPresent(message),
            409 if error_type == "Reference Not Zero" => ScmError::ReferenceNotZero(message),
            409 => ScmError::NameNotUnique(message),
            500..=599 => ScmError::Server { status, message },
            _ => ScmError::Api { status, message },
        }
    }

    /// True for the kinds raised locally, before any request is sent
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ScmError::InvalidObject(_) | ScmError::MissingQueryParameter(_)
        )
    }
}

fn first_error(body: &Value) -> Option<&Value> {
    body.get("_errors").and_then(|v| v.as_array()).and_then(|arr| arr.first())
}

fn error_message(body: &Value) -> Option<String> {
    let err = first_error(body)?;
    let message = err.get("message").and_then(|v| v.as_str())?;
    match err.get("details").and_then(|d| d.get("message")).and_then(|v| v.as_str()) {
        Some(detail) if detail != message => Some(format!("{} ({})", message, detail)),
        _ => Some(message.to_string()),
    }
}

fn error_type(body: &Value) -> Option<String> {
    first_error(body)?
        .get("details")?
        .get("errorType")?
        .as_str()
        .map(|s| s.to_string())
}

impl From<serde_json::Error> for ScmError {
    fn from(err: serde_json::Error) -> Self {
        ScmError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for ScmError {
    fn from(err: reqwest::Error) -> Self {
        ScmError::Transport(err.to_string())
    }
}

impl From<url::ParseError> for ScmError {
    fn from(err: url::ParseError) -> Self {
        ScmError::Config(format!("invalid URL: {}", err))
    }
}

/// Format an SDK error for display
/// Security: generic messages for auth and server failures avoid echoing API internals
pub fn format_error(error: &ScmError) -> String {
    match error {
        ScmError::Authentication(_) => {
            "Authentication failed. Check your access token.".to_string()
        },
        ScmError::Server { .. } => {
            "Service temporarily unavailable. Please try again.".to_string()
        },
        ScmError::Api { status: 429, .. } => {
            "Rate limit exceeded. Please try again later.".to_string()
        },
        ScmError::Transport(_) => {
            "Request failed. Check your network connection and try again.".to_string()
        },
        other => {
            let text = other.to_string();
            let sanitized: String = text
                .chars()
                .filter(|c| c.is_ascii_graphic() || *c == ' ')
                .take(120)
                .collect();
            if sanitized.len() < text.len() {
                format!("{}...", sanitized)
            } else {
                sanitized
            }
        },
    }
}
