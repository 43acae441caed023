//! List Paginator
//!
//! Walks a collection endpoint with an offset/limit cursor until every
//! matching object has been retrieved. Pages are requested strictly one
//! after another since each offset depends on the previous page.

use crate::api::client::ApiClient;
use crate::error::{Result, ScmError};
use serde_json::Value;

/// Page size used when none is configured
pub const DEFAULT_MAX_LIMIT: usize = 2500;

/// Largest page the API serves
pub const MAX_PAGE_SIZE: usize = 5000;

/// Validate a requested page size: values above the server maximum are
/// clamped, zero and negative values are rejected.
pub fn validate_max_limit(value: i64) -> Result<usize> {
    if value <= 0 {
        return Err(ScmError::InvalidObject(format!(
            "max_limit must be greater than 0, got {}",
            value
        )));
    }
    let value = usize::try_from(value).unwrap_or(MAX_PAGE_SIZE);
    if value > MAX_PAGE_SIZE {
        tracing::debug!("max_limit {} clamped to {}", value, MAX_PAGE_SIZE);
    }
    Ok(value.min(MAX_PAGE_SIZE))
}

/// One page of a list response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub data: Vec<Value>,
    /// Page size the server applied; may be smaller than requested
    pub limit: usize,
    /// Total number of matching objects, when the server reports it
    pub total: Option<usize>,
}

impl Page {
    /// Parse a list response: `{"data": [...], "limit", "total"}` or a bare
    /// array. `limit` is the requested page size, used when none is echoed.
    pub fn from_response(response: Value, limit: usize) -> Result<Self> {
        match response {
            Value::Array(data) => Ok(Self {
                data,
                limit,
                total: None,
            }),
            Value::Object(mut map) => {
                let data = match map.remove("data") {
                    Some(Value::Array(arr)) => arr,
                    Some(Value::Null) | None => Vec::new(),
                    Some(other) => {
                        return Err(ScmError::Serialization(format!(
                            "expected 'data' to be an array, got {}",
                            other
                        )))
                    },
                };
                let number = |key: &str| {
                    map.get(key)
                        .and_then(|v| v.as_u64())
                        .map(|n| n as usize)
                };
                Ok(Self {
                    data,
                    limit: number("limit").filter(|n| *n > 0).unwrap_or(limit),
                    total: number("total"),
                })
            },
            Value::Null => Ok(Self {
                limit,
                ..Self::default()
            }),
            other => Err(ScmError::Serialization(format!(
                "unexpected list response: {}",
                other
            ))),
        }
    }
}

/// Fetch one page of a collection
pub async fn fetch_page(
    api: &ApiClient,
    endpoint: &str,
    params: &[(&str, String)],
    offset: usize,
    limit: usize,
) -> Result<Page> {
    let mut query: Vec<(&str, String)> = params.to_vec();
    query.push(("limit", limit.to_string()));
    query.push(("offset", offset.to_string()));

    let response = api.get(endpoint, &query).await?;
    Page::from_response(response, limit)
}

/// Fetch all pages of a collection (auto-paginate)
///
/// Stops on a short page, an empty page, or once the reported total has
/// been reached. When the server serves fewer objects per page than asked
/// for and says so in `limit`, the walk steps by the served size instead.
/// Objects inserted or removed mid-walk may be missed or seen twice; no
/// deduplication is attempted.
pub async fn fetch_all_pages(
    api: &ApiClient,
    endpoint: &str,
    params: &[(&str, String)],
    page_size: usize,
) -> Result<Vec<Value>> {
    // Public entry point: callers may not have gone through validate_max_limit
    let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
    let mut all_items = Vec::new();
    let mut offset = 0;
    let mut pages = 0;

    loop {
        let page = fetch_page(api, endpoint, params, offset, page_size).await?;
        pages += 1;

        let served = page.limit.min(page_size);
        if served < page_size && pages == 1 {
            tracing::warn!(
                "{} serves {} objects per page, {} requested",
                endpoint,
                served,
                page_size
            );
        }

        let received = page.data.len();
        all_items.extend(page.data);
        offset += served;

        if received < served {
            break;
        }
        if matches!(page.total, Some(total) if offset >= total) {
            break;
        }
    }

    tracing::debug!(
        "Fetched {} objects from {} in {} page(s)",
        all_items.len(),
        endpoint,
        pages
    );

    Ok(all_items)
}
