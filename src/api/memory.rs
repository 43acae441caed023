//! In-memory API
//!
//! [`InMemoryTransport`] answers requests the way the configuration API does,
//! without a network: per-container name uniqueness, folder inheritance on
//! listing, reference counting on delete, offset/limit paging and commit
//! jobs. Every request is recorded so callers can assert on traffic.

use super::transport::{ApiRequest, ApiResponse, Method, Transport};
use crate::error::Result;
use crate::resource::paginator::MAX_PAGE_SIZE;
use futures::future::BoxFuture;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Page size the API uses when no limit is given
const SERVER_DEFAULT_LIMIT: usize = 200;

const CONTAINER_FIELDS: [&str; 3] = ["folder", "snippet", "device"];

const OPERATIONS_PREFIX: &str = "/config/operations/v1/";

/// Build an error body in the API's `_errors` format
pub fn error_body(error_type: &str, message: &str) -> Value {
    json!({
        "_errors": [{
            "code": "E003",
            "message": message,
            "details": {"errorType": error_type}
        }],
        "_request_id": Uuid::new_v4().to_string()
    })
}

#[derive(Default)]
struct State {
    /// Objects per collection endpoint, in insertion order
    collections: BTreeMap<String, Vec<Value>>,
    /// Folder name -> parent folder name
    folder_parents: HashMap<String, String>,
    /// Object id -> number of referencing objects
    references: HashMap<String, usize>,
    jobs: Vec<Value>,
    /// Job id -> remaining status polls before it finishes
    pending_polls: HashMap<String, usize>,
    commit_polls: usize,
    requests: Vec<ApiRequest>,
    failures: VecDeque<ApiResponse>,
}

/// Fake configuration API
#[derive(Default)]
pub struct InMemoryTransport {
    state: Mutex<State>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // =========================================================================
    // Setup
    // =========================================================================

    /// Declare `parent` as the parent folder of `child`; listing `child`
    /// also returns objects defined in its ancestors
    pub fn set_folder_parent(&self, child: &str, parent: &str) {
        self.state()
            .folder_parents
            .insert(child.to_string(), parent.to_string());
    }

    /// Insert objects directly, assigning ids where missing. Returns the ids.
    pub fn seed(&self, endpoint: &str, objects: impl IntoIterator<Item = Value>) -> Vec<String> {
        let mut state = self.state();
        let collection = state.collections.entry(endpoint.to_string()).or_default();
        let mut ids = Vec::new();

        for mut object in objects {
            if let Value::Object(map) = &mut object {
                let id = map
                    .get("id")
                    .and_then(|v| v.as_str())
                    .map(String::from)
                    .unwrap_or_else(|| Uuid::new_v4().to_string());
                map.insert("id".to_string(), Value::String(id.clone()));
                ids.push(id);
            }
            collection.push(object);
        }
        ids
    }

    /// Record that another object references `id`
    pub fn add_reference(&self, id: &str) {
        *self.state().references.entry(id.to_string()).or_default() += 1;
    }

    /// Drop one reference to `id`
    pub fn remove_reference(&self, id: &str) {
        let mut state = self.state();
        if let Some(count) = state.references.get_mut(id) {
            *count = count.saturating_sub(1);
        }
    }

    /// Number of status polls a commit job stays active before finishing
    pub fn set_commit_polls(&self, polls: usize) {
        self.state().commit_polls = polls;
    }

    /// Answer the next request with `status` and `body` instead of handling it
    pub fn fail_next(&self, status: u16, body: Value) {
        self.state().failures.push_back(ApiResponse::new(status, body));
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Every request received so far
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.state().requests.clear();
    }

    /// Number of paged list requests sent to `endpoint`
    pub fn page_requests(&self, endpoint: &str) -> usize {
        self.state()
            .requests
            .iter()
            .filter(|r| r.method == Method::Get && r.path == endpoint)
            .filter(|r| r.query_param("offset").is_some())
            .count()
    }

    /// Number of objects stored under `endpoint`
    pub fn object_count(&self, endpoint: &str) -> usize {
        self.state()
            .collections
            .get(endpoint)
            .map(|c| c.len())
            .unwrap_or(0)
    }

    // =========================================================================
    // Request handling
    // =========================================================================

    fn handle(&self, request: ApiRequest) -> ApiResponse {
        let mut state = self.state();
        state.requests.push(request.clone());

        if let Some(failure) = state.failures.pop_front() {
            return failure;
        }

        if let Some(rest) = request.path.strip_prefix(OPERATIONS_PREFIX) {
            return handle_operations(&mut state, &request, rest);
        }

        let Some((endpoint, id)) = split_path(&request.path) else {
            return ApiResponse::new(404, error_body("Not Found", "unknown path"));
        };

        match (request.method, id) {
            (Method::Get, None) => list_objects(&state, &endpoint, &request),
            (Method::Post, None) => create_object(&mut state, &endpoint, &request),
            (Method::Get, Some(id)) => match find(&state, &endpoint, &id) {
                Some(idx) => ApiResponse::new(200, state.collections[&endpoint][idx].clone()),
                None => not_present(&id),
            },
            (Method::Put, Some(id)) => update_object(&mut state, &endpoint, &id, &request),
            (Method::Delete, Some(id)) => delete_object(&mut state, &endpoint, &id),
            _ => ApiResponse::new(405, error_body("Method Not Allowed", "unsupported method")),
        }
    }
}

impl Transport for InMemoryTransport {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse>> {
        let response = self.handle(request);
        Box::pin(async move { Ok(response) })
    }
}

/// Split `/config/{service}/v1/{collection}[/{id}]`
fn split_path(path: &str) -> Option<(String, Option<String>)> {
    let segments: Vec<&str> = path.trim_end_matches('/').split('/').collect();
    match segments.as_slice() {
        ["", "config", _, "v1", _] => Some((segments.join("/"), None)),
        ["", "config", _, "v1", _, id] => {
            let endpoint = segments[..5].join("/");
            let id = urlencoding::decode(id).ok()?.into_owned();
            Some((endpoint, Some(id)))
        },
        _ => None,
    }
}

fn not_present(id: &str) -> ApiResponse {
    ApiResponse::new(
        404,
        error_body("Object Not Present", &format!("object {} not found", id)),
    )
}

fn find(state: &State, endpoint: &str, id: &str) -> Option<usize> {
    state
        .collections
        .get(endpoint)?
        .iter()
        .position(|o| o.get("id").and_then(|v| v.as_str()) == Some(id))
}

fn container_of(object: &Map<String, Value>) -> Vec<(String, String)> {
    CONTAINER_FIELDS
        .iter()
        .filter_map(|field| {
            object
                .get(*field)
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(|name| (field.to_string(), name.to_string()))
        })
        .collect()
}

fn name_taken(
    state: &State,
    endpoint: &str,
    name: &str,
    container: &[(String, String)],
    except: Option<&str>,
) -> bool {
    let Some(objects) = state.collections.get(endpoint) else {
        return false;
    };
    objects.iter().filter_map(|o| o.as_object()).any(|o| {
        o.get("name").and_then(|v| v.as_str()) == Some(name)
            && container_of(o) == container
            && o.get("id").and_then(|v| v.as_str()) != except
    })
}

/// Folder followed by its ancestors
fn folder_chain(state: &State, folder: &str) -> Vec<String> {
    let mut chain = vec![folder.to_string()];
    let mut current = folder;
    while let Some(parent) = state.folder_parents.get(current) {
        if chain.contains(parent) {
            break;
        }
        chain.push(parent.clone());
        current = parent;
    }
    chain
}

fn list_objects(state: &State, endpoint: &str, request: &ApiRequest) -> ApiResponse {
    let containers: Vec<(&str, &str)> = CONTAINER_FIELDS
        .iter()
        .filter_map(|f| request.query_param(f).map(|v| (*f, v)))
        .collect();

    let [(field, container)] = containers.as_slice() else {
        return ApiResponse::new(
            400,
            error_body(
                "Missing Query Parameter",
                "exactly one of folder, snippet or device is required",
            ),
        );
    };

    let parse = |key: &str, default: usize| -> std::result::Result<usize, ApiResponse> {
        match request.query_param(key) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|_| {
                ApiResponse::new(400, error_body("Invalid Query Parameter", &format!("bad {}", key)))
            }),
        }
    };
    let limit = match parse("limit", SERVER_DEFAULT_LIMIT) {
        Ok(limit) if (1..=MAX_PAGE_SIZE).contains(&limit) => limit,
        Ok(_) => {
            return ApiResponse::new(
                400,
                error_body("Invalid Query Parameter", "limit must be between 1 and 5000"),
            )
        },
        Err(response) => return response,
    };
    let offset = match parse("offset", 0) {
        Ok(offset) => offset,
        Err(response) => return response,
    };

    let visible: Vec<String> = if *field == "folder" {
        folder_chain(state, container)
    } else {
        vec![container.to_string()]
    };
    let name = request.query_param("name");

    let matching: Vec<&Value> = state
        .collections
        .get(endpoint)
        .map(|objects| {
            objects
                .iter()
                .filter(|o| {
                    o.get(*field)
                        .and_then(|v| v.as_str())
                        .map(|c| visible.iter().any(|v| v == c))
                        .unwrap_or(false)
                })
                .filter(|o| match name {
                    Some(name) => o.get("name").and_then(|v| v.as_str()) == Some(name),
                    None => true,
                })
                .collect()
        })
        .unwrap_or_default();

    let total = matching.len();
    let data: Vec<Value> = matching.into_iter().skip(offset).take(limit).cloned().collect();

    ApiResponse::new(
        200,
        json!({
            "data": data,
            "offset": offset,
            "limit": limit,
            "total": total,
        }),
    )
}

fn create_object(state: &mut State, endpoint: &str, request: &ApiRequest) -> ApiResponse {
    let Some(Value::Object(mut object)) = request.body.clone() else {
        return ApiResponse::new(400, error_body("Invalid Object", "body must be an object"));
    };

    let Some(name) = object.get("name").and_then(|v| v.as_str()).map(String::from) else {
        return ApiResponse::new(400, error_body("Invalid Object", "name is required"));
    };

    let container = container_of(&object);
    if container.len() != 1 {
        return ApiResponse::new(
            400,
            error_body("Invalid Object", "exactly one of folder, snippet or device is required"),
        );
    }

    if name_taken(state, endpoint, &name, &container, None) {
        return ApiResponse::new(
            409,
            error_body("Name Not Unique", &format!("'{}' is not unique", name)),
        );
    }

    object.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    let object = Value::Object(object);
    state
        .collections
        .entry(endpoint.to_string())
        .or_default()
        .push(object.clone());

    ApiResponse::new(201, object)
}

fn update_object(state: &mut State, endpoint: &str, id: &str, request: &ApiRequest) -> ApiResponse {
    let Some(idx) = find(state, endpoint, id) else {
        return not_present(id);
    };
    let Some(Value::Object(mut object)) = request.body.clone() else {
        return ApiResponse::new(400, error_body("Invalid Object", "body must be an object"));
    };
    let Some(name) = object.get("name").and_then(|v| v.as_str()).map(String::from) else {
        return ApiResponse::new(400, error_body("Invalid Object", "name is required"));
    };

    let existing = state.collections[endpoint][idx]
        .as_object()
        .cloned()
        .unwrap_or_default();

    // Placement cannot change on update; keep the stored container
    for field in CONTAINER_FIELDS {
        object.remove(field);
        if let Some(value) = existing.get(field) {
            object.insert(field.to_string(), value.clone());
        }
    }

    if name_taken(state, endpoint, &name, &container_of(&object), Some(id)) {
        return ApiResponse::new(
            409,
            error_body("Name Not Unique", &format!("'{}' is not unique", name)),
        );
    }

    object.insert("id".to_string(), Value::String(id.to_string()));
    let object = Value::Object(object);
    if let Some(objects) = state.collections.get_mut(endpoint) {
        objects[idx] = object.clone();
    }

    ApiResponse::new(200, object)
}

fn delete_object(state: &mut State, endpoint: &str, id: &str) -> ApiResponse {
    let Some(idx) = find(state, endpoint, id) else {
        return not_present(id);
    };

    if state.references.get(id).copied().unwrap_or(0) > 0 {
        return ApiResponse::new(
            409,
            error_body("Reference Not Zero", &format!("object {} is still referenced", id)),
        );
    }

    if let Some(objects) = state.collections.get_mut(endpoint) {
        objects.remove(idx);
    }
    ApiResponse::new(200, Value::Null)
}

// =============================================================================
// Operations (commits and jobs)
// =============================================================================

fn handle_operations(state: &mut State, request: &ApiRequest, rest: &str) -> ApiResponse {
    match (request.method, rest) {
        (Method::Post, "config-versions/candidate:push") => push_candidate(state, request),
        (Method::Get, "jobs") => {
            let limit = request
                .query_param("limit")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(SERVER_DEFAULT_LIMIT);
            let data: Vec<Value> = state.jobs.iter().rev().take(limit).cloned().collect();
            ApiResponse::new(
                200,
                json!({"data": data, "total": state.jobs.len(), "limit": limit, "offset": 0}),
            )
        },
        (Method::Get, path) if path.starts_with("jobs/") => {
            let id = &path["jobs/".len()..];
            job_status(state, id)
        },
        _ => ApiResponse::new(404, error_body("Not Found", "unknown operation")),
    }
}

fn push_candidate(state: &mut State, request: &ApiRequest) -> ApiResponse {
    let folders = request
        .body
        .as_ref()
        .and_then(|b| b.get("folders"))
        .and_then(|f| f.as_array())
        .map(|f| f.len())
        .unwrap_or(0);
    if folders == 0 {
        return ApiResponse::new(400, error_body("Invalid Object", "folders is required"));
    }

    let id = (state.jobs.len() + 1).to_string();
    let description = request
        .body
        .as_ref()
        .and_then(|b| b.get("description"))
        .cloned()
        .unwrap_or(Value::Null);

    let finished = state.commit_polls == 0;
    let (status, result, percent) = if finished {
        ("FIN", "OK", "100")
    } else {
        ("ACT", "PEND", "0")
    };
    state.jobs.push(json!({
        "id": id,
        "type_str": "CommitAndPush",
        "status_str": status,
        "result_str": result,
        "percent": percent,
        "description": description,
        "start_ts": "2025-01-01 00:00:00",
    }));
    if !finished {
        state.pending_polls.insert(id.clone(), state.commit_polls);
    }

    ApiResponse::new(
        200,
        json!({
            "success": true,
            "job_id": id,
            "message": format!("CommitAndPush job enqueued with jobid {}", id),
        }),
    )
}

fn job_status(state: &mut State, id: &str) -> ApiResponse {
    let Some(idx) = state.jobs.iter().position(|j| j["id"] == id) else {
        return not_present(id);
    };

    if let Some(remaining) = state.pending_polls.get_mut(id) {
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            state.pending_polls.remove(id);
            if let Value::Object(job) = &mut state.jobs[idx] {
                job.insert("status_str".to_string(), json!("FIN"));
                job.insert("result_str".to_string(), json!("OK"));
                job.insert("percent".to_string(), json!("100"));
                job.insert("end_ts".to_string(), json!("2025-01-01 00:01:00"));
            }
        }
    }

    ApiResponse::new(200, json!({"data": [state.jobs[idx].clone()]}))
}
