//! Integration tests for the HTTP transport using wiremock
//!
//! These tests drive the typed clients over real HTTP against mocked
//! endpoints, checking authentication, status-to-error mapping, query
//! parameters and pagination.

use scm_sdk::api::auth::Credentials;
use scm_sdk::models::{DnsProxy, IkeCryptoProfile, SecurityZone};
use scm_sdk::resource::ResourceClient;
use scm_sdk::{ApiClient, ListQuery, Location, NewObject, ScmError};
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{bearer_token, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ZONES: &str = "/config/network/v1/zones";

fn api(server: &MockServer) -> ApiClient {
    ApiClient::http(&server.uri(), Credentials::from_token("test-token")).unwrap()
}

fn api_error(error_type: &str, message: &str) -> Value {
    json!({
        "_errors": [{
            "code": "E006",
            "message": message,
            "details": {"errorType": error_type}
        }],
        "_request_id": "5a1b"
    })
}

fn zone(id: Uuid, name: &str, folder: &str) -> Value {
    json!({
        "id": id.to_string(),
        "name": name,
        "folder": folder,
        "network": {"layer3": ["ethernet1/1"]}
    })
}

/// Test module for request shape and authentication
mod http_client_tests {
    use super::*;

    /// Test requests carry the bearer token and the container parameter
    #[tokio::test]
    async fn test_list_sends_token_and_container() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(ZONES))
            .and(bearer_token("test-token"))
            .and(query_param("folder", "Texas"))
            .and(query_param("limit", "2500"))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [zone(Uuid::new_v4(), "trust", "Texas")],
                "offset": 0,
                "limit": 2500,
                "total": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let zones: ResourceClient<SecurityZone> = ResourceClient::new(api(&server)).unwrap();
        let result = zones.list(&ListQuery::folder("Texas")).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "trust");
        assert_eq!(result[0].attributes.mode(), Some("layer3"));
    }

    /// Test create posts the flattened payload and parses the response
    #[tokio::test]
    async fn test_create_posts_flat_payload() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();

        Mock::given(method("POST"))
            .and(path("/config/network/v1/ike-crypto-profiles"))
            .and(body_partial_json(json!({
                "name": "ike-aes",
                "folder": "Texas",
                "hash": ["sha256"],
                "encryption": ["aes-256-cbc"],
                "dh_group": ["group14"]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": id.to_string(),
                "name": "ike-aes",
                "folder": "Texas",
                "hash": ["sha256"],
                "encryption": ["aes-256-cbc"],
                "dh_group": ["group14"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client: ResourceClient<IkeCryptoProfile> = ResourceClient::new(api(&server)).unwrap();
        let profile = IkeCryptoProfile::new(["sha256"], ["aes-256-cbc"], ["group14"]);
        let created = client
            .create(&NewObject::new("ike-aes", profile).in_folder("Texas"))
            .await
            .unwrap();

        assert_eq!(created.id, id);
        assert_eq!(created.location(), Some(Location::folder("Texas")));
    }

    /// Test update sends PUT to the object path without the id in the body
    #[tokio::test]
    async fn test_update_puts_to_object_path() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();

        Mock::given(method("PUT"))
            .and(path(format!("{}/{}", ZONES, id)))
            .and(body_partial_json(json!({"name": "trust", "folder": "Texas"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(zone(id, "trust", "Texas")))
            .expect(1)
            .mount(&server)
            .await;

        let zones: ResourceClient<SecurityZone> = ResourceClient::new(api(&server)).unwrap();
        let object = serde_json::from_value(zone(id, "trust", "Texas")).unwrap();
        let updated = zones.update(&object).await.unwrap();
        assert_eq!(updated.id, id);

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(body.get("id").is_none());
    }

    /// Test fetch filters on name and container and ignores near-misses
    #[tokio::test]
    async fn test_fetch_by_name() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();

        Mock::given(method("GET"))
            .and(path("/config/network/v1/dns-proxies"))
            .and(query_param("name", "dns-main"))
            .and(query_param("snippet", "base"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"id": Uuid::new_v4().to_string(), "name": "dns-main-old", "snippet": "base"},
                    {"id": id.to_string(), "name": "dns-main", "snippet": "base", "enabled": true}
                ],
                "offset": 0,
                "total": 2
            })))
            .mount(&server)
            .await;

        let client: ResourceClient<DnsProxy> = ResourceClient::new(api(&server)).unwrap();
        let proxy = client
            .fetch("dns-main", &Location::snippet("base"))
            .await
            .unwrap();

        assert_eq!(proxy.id, id);
        assert_eq!(proxy.attributes.enabled, Some(true));
    }
}

/// Test module for status-to-error mapping
mod error_mapping_tests {
    use super::*;

    async fn get_with_status(status: u16, body: Value) -> ScmError {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();

        Mock::given(method("GET"))
            .and(path(format!("{}/{}", ZONES, id)))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;

        let zones: ResourceClient<SecurityZone> = ResourceClient::new(api(&server)).unwrap();
        zones.get(id).await.unwrap_err()
    }

    /// Test 401 response indicates authentication failure
    #[tokio::test]
    async fn test_401_returns_authentication() {
        let err = get_with_status(401, api_error("Not Authenticated", "token expired")).await;
        assert!(matches!(err, ScmError::Authentication(_)));
    }

    /// Test 404 response maps to object not present
    #[tokio::test]
    async fn test_404_returns_object_not_present() {
        let err = get_with_status(404, api_error("Object Not Present", "no such zone")).await;
        assert!(matches!(err, ScmError::ObjectNotPresent(ref m) if m.contains("no such zone")));
    }

    /// Test 500 response maps to server error
    #[tokio::test]
    async fn test_500_returns_server_error() {
        let err = get_with_status(500, json!({"message": "internal"})).await;
        assert!(matches!(err, ScmError::Server { status: 500, .. }));
    }

    /// Test 409 on create is split by error type
    #[tokio::test]
    async fn test_409_name_not_unique() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(ZONES))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(api_error("Name Not Unique", "exists")),
            )
            .mount(&server)
            .await;

        let zones: ResourceClient<SecurityZone> = ResourceClient::new(api(&server)).unwrap();
        let err = zones
            .create(&NewObject::new("trust", SecurityZone::default()).in_folder("Texas"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScmError::NameNotUnique(_)));
    }

    /// Test 409 on delete maps to reference not zero
    #[tokio::test]
    async fn test_409_reference_not_zero() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();

        Mock::given(method("DELETE"))
            .and(path(format!("{}/{}", ZONES, id)))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_json(api_error("Reference Not Zero", "used by a rule")),
            )
            .mount(&server)
            .await;

        let zones: ResourceClient<SecurityZone> = ResourceClient::new(api(&server)).unwrap();
        let err = zones.delete(id).await.unwrap_err();
        assert!(matches!(err, ScmError::ReferenceNotZero(_)));
    }

    /// Test a non-JSON error body still maps by status
    #[tokio::test]
    async fn test_plain_text_error_body() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();

        Mock::given(method("GET"))
            .and(path(format!("{}/{}", ZONES, id)))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .mount(&server)
            .await;

        let zones: ResourceClient<SecurityZone> = ResourceClient::new(api(&server)).unwrap();
        let err = zones.get(id).await.unwrap_err();
        assert!(matches!(err, ScmError::Server { status: 503, .. }));
    }

    /// Test invalid input never reaches the server
    #[tokio::test]
    async fn test_invalid_container_sends_nothing() {
        let server = MockServer::start().await;

        let zones: ResourceClient<SecurityZone> = ResourceClient::new(api(&server)).unwrap();
        let err = zones
            .create(
                &NewObject::new("trust", SecurityZone::default())
                    .in_folder("Texas")
                    .in_snippet("base"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ScmError::InvalidObject(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}

/// Test module for pagination over HTTP
mod pagination_tests {
    use super::*;

    fn page(offset: usize, count: usize, total: usize) -> Value {
        let data: Vec<Value> = (offset..offset + count)
            .map(|i| zone(Uuid::new_v4(), &format!("zone-{}", i), "Texas"))
            .collect();
        json!({"data": data, "offset": offset, "limit": 2, "total": total})
    }

    /// Test the client walks offsets until a short page
    #[tokio::test]
    async fn test_walks_offsets_until_short_page() {
        let server = MockServer::start().await;

        for (offset, count) in [(0, 2), (2, 2), (4, 1)] {
            Mock::given(method("GET"))
                .and(path(ZONES))
                .and(query_param("limit", "2"))
                .and(query_param("offset", offset.to_string()))
                .respond_with(ResponseTemplate::new(200).set_body_json(page(offset, count, 5)))
                .expect(1)
                .mount(&server)
                .await;
        }

        let zones: ResourceClient<SecurityZone> = ResourceClient::new(api(&server))
            .unwrap()
            .with_max_limit(2)
            .unwrap();
        let result = zones.list(&ListQuery::folder("Texas")).await.unwrap();

        let names: Vec<String> = result.into_iter().map(|z| z.name).collect();
        assert_eq!(names, vec!["zone-0", "zone-1", "zone-2", "zone-3", "zone-4"]);
    }

    /// Test an exact multiple of the page size stops on the reported total
    #[tokio::test]
    async fn test_stops_on_total() {
        let server = MockServer::start().await;

        for offset in [0, 2] {
            Mock::given(method("GET"))
                .and(path(ZONES))
                .and(query_param("offset", offset.to_string()))
                .respond_with(ResponseTemplate::new(200).set_body_json(page(offset, 2, 4)))
                .expect(1)
                .mount(&server)
                .await;
        }

        let zones: ResourceClient<SecurityZone> = ResourceClient::new(api(&server))
            .unwrap()
            .with_max_limit(2)
            .unwrap();
        assert_eq!(zones.list(&ListQuery::folder("Texas")).await.unwrap().len(), 4);
    }

    /// Test a server capping the page size below the request is still walked to the end
    #[tokio::test]
    async fn test_follows_server_capped_page_size() {
        let server = MockServer::start().await;

        for (offset, count) in [(0, 2), (2, 2), (4, 1)] {
            Mock::given(method("GET"))
                .and(path(ZONES))
                .and(query_param("limit", "5"))
                .and(query_param("offset", offset.to_string()))
                .respond_with(ResponseTemplate::new(200).set_body_json(page(offset, count, 5)))
                .expect(1)
                .mount(&server)
                .await;
        }

        let zones: ResourceClient<SecurityZone> = ResourceClient::new(api(&server))
            .unwrap()
            .with_max_limit(5)
            .unwrap();
        let result = zones.list(&ListQuery::folder("Texas")).await.unwrap();

        let names: Vec<String> = result.into_iter().map(|z| z.name).collect();
        assert_eq!(names, vec!["zone-0", "zone-1", "zone-2", "zone-3", "zone-4"]);
    }

    /// Test a failing page aborts the whole listing
    #[tokio::test]
    async fn test_error_mid_walk_propagates() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(ZONES))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(0, 2, 4)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(ZONES))
            .and(query_param("offset", "2"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let zones: ResourceClient<SecurityZone> = ResourceClient::new(api(&server))
            .unwrap()
            .with_max_limit(2)
            .unwrap();
        let err = zones.list(&ListQuery::folder("Texas")).await.unwrap_err();
        assert!(matches!(err, ScmError::Server { status: 502, .. }));
    }
}
