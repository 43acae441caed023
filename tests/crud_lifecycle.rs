//! End-to-end tests of the unified client against the in-memory API
//!
//! Covers the object lifecycle (create, get, fetch, update, delete), the
//! listing rules and commits, checking both results and the requests sent.

use scm_sdk::api::memory::InMemoryTransport;
use scm_sdk::api::transport::Method;
use scm_sdk::models::{
    AggregateBandwidth, BgpAuthProfile, IkeCryptoProfile, IkeLifetime, IpsecTunnel, QosProfile,
    SecurityZone, TunnelInterface, ZoneNetwork,
};
use scm_sdk::resource::ContainerFields;
use scm_sdk::{ListQuery, Location, NewObject, Scm, ScmError};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const ZONES: &str = "/config/network/v1/zones";
const IPSEC_TUNNELS: &str = "/config/network/v1/ipsec-tunnels";

fn setup() -> (Arc<InMemoryTransport>, Scm) {
    let transport = Arc::new(InMemoryTransport::new());
    let scm = Scm::with_transport(transport.clone())
        .unwrap()
        .with_poll_interval(Duration::from_millis(10));
    (transport, scm)
}

fn layer3_zone(interfaces: &[&str]) -> SecurityZone {
    SecurityZone {
        network: Some(ZoneNetwork {
            layer3: Some(interfaces.iter().map(|s| s.to_string()).collect()),
            ..ZoneNetwork::default()
        }),
        ..SecurityZone::default()
    }
}

// =============================================================================
// Container validation
// =============================================================================

#[tokio::test]
async fn test_create_without_container_sends_nothing() {
    let (transport, scm) = setup();

    let err = scm
        .security_zone
        .create(&NewObject::new("trust", layer3_zone(&[])))
        .await
        .unwrap_err();

    assert!(matches!(err, ScmError::InvalidObject(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_create_with_two_containers_sends_nothing() {
    let (transport, scm) = setup();

    let data = NewObject::new("bgp-auth", BgpAuthProfile::with_secret("s3cret"))
        .in_folder("Texas")
        .on_device("fw-01");
    let err = scm.bgp_auth_profile.create(&data).await.unwrap_err();

    assert!(matches!(err, ScmError::InvalidObject(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_invalid_attributes_send_nothing() {
    let (transport, scm) = setup();

    let profile = IkeCryptoProfile::new(["sha256"], ["rot13"], ["group14"]);
    let err = scm
        .ike_crypto_profile
        .create(&NewObject::new("ike", profile).in_folder("Texas"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScmError::InvalidObject(_)));

    let qos = QosProfile {
        aggregate_bandwidth: Some(AggregateBandwidth {
            egress_max: Some(100),
            egress_guaranteed: Some(200),
        }),
        ..QosProfile::default()
    };
    let err = scm
        .qos_profile
        .create(&NewObject::new("qos", qos).in_folder("Texas"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScmError::InvalidObject(_)));

    assert!(transport.requests().is_empty());
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let (_, scm) = setup();

    let profile = IkeCryptoProfile::new(["sha256", "sha384"], ["aes-256-cbc"], ["group14"])
        .with_lifetime(IkeLifetime::Hours(8));
    let data = NewObject::new("ike-primary", profile).in_folder("Texas");

    let created = scm.ike_crypto_profile.create(&data).await.unwrap();
    let fetched = scm.ike_crypto_profile.get(created.id).await.unwrap();

    assert_eq!(fetched.name, data.name);
    assert_eq!(fetched.container, data.container);
    assert_eq!(fetched.attributes, data.attributes);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_fetch_and_update() {
    let (_, scm) = setup();

    let data = NewObject::new("tun-1", TunnelInterface::default()).in_snippet("base");
    let created = scm.tunnel_interface.create(&data).await.unwrap();

    let mut found = scm
        .tunnel_interface
        .fetch("tun-1", &Location::snippet("base"))
        .await
        .unwrap();
    assert_eq!(found.id, created.id);

    found.attributes.mtu = Some(1400);
    found.attributes.comment = Some("uplink".to_string());
    let updated = scm.tunnel_interface.update(&found).await.unwrap();
    assert_eq!(updated.attributes.mtu, Some(1400));

    let again = scm.tunnel_interface.get(created.id).await.unwrap();
    assert_eq!(again.attributes.comment.as_deref(), Some("uplink"));
    assert_eq!(again.location(), Some(Location::snippet("base")));
}

#[tokio::test]
async fn test_update_without_container_sends_nothing() {
    let (transport, scm) = setup();

    let data = NewObject::new("tun-1", TunnelInterface::default()).in_folder("Texas");
    let created = scm.tunnel_interface.create(&data).await.unwrap();
    transport.clear_requests();

    let mut object = created.clone();
    object.container = ContainerFields::default();
    let err = scm.tunnel_interface.update(&object).await.unwrap_err();
    assert!(matches!(err, ScmError::InvalidObject(_)));

    let mut object = created;
    object.container.device = Some("fw-01".to_string());
    let err = scm.tunnel_interface.update(&object).await.unwrap_err();
    assert!(matches!(err, ScmError::InvalidObject(_)));

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_fetch_requires_name_and_reports_absence() {
    let (transport, scm) = setup();

    let err = scm
        .dns_proxy
        .fetch("", &Location::folder("Texas"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScmError::MissingQueryParameter(_)));
    assert!(transport.requests().is_empty());

    let err = scm
        .dns_proxy
        .fetch("missing", &Location::folder("Texas"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScmError::ObjectNotPresent(_)));
}

#[tokio::test]
async fn test_duplicate_name_in_container() {
    let (_, scm) = setup();

    let data = NewObject::new("trust", layer3_zone(&["ethernet1/1"])).in_folder("Texas");
    scm.security_zone.create(&data).await.unwrap();

    let err = scm.security_zone.create(&data).await.unwrap_err();
    assert!(matches!(err, ScmError::NameNotUnique(_)));

    // Same name in another container is fine
    let other = NewObject::new("trust", layer3_zone(&[])).in_folder("Austin");
    assert!(scm.security_zone.create(&other).await.is_ok());
}

#[tokio::test]
async fn test_delete_referenced_object_keeps_it() {
    let (transport, scm) = setup();

    let tunnel =
        NewObject::new("vpn-1", IpsecTunnel::new("gw-1", "ipsec-default")).in_folder("Texas");
    let created = scm.ipsec_tunnel.create(&tunnel).await.unwrap();
    transport.add_reference(&created.id.to_string());

    let err = scm.ipsec_tunnel.delete(created.id).await.unwrap_err();
    assert!(matches!(err, ScmError::ReferenceNotZero(_)));
    assert_eq!(scm.ipsec_tunnel.get(created.id).await.unwrap(), created);
    assert_eq!(transport.object_count(IPSEC_TUNNELS), 1);

    transport.remove_reference(&created.id.to_string());
    scm.ipsec_tunnel.delete(created.id).await.unwrap();
    assert_eq!(transport.object_count(IPSEC_TUNNELS), 0);

    let err = scm.ipsec_tunnel.get(created.id).await.unwrap_err();
    assert!(matches!(err, ScmError::ObjectNotPresent(_)));
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_list_12000_objects_in_5_pages() {
    let (transport, scm) = setup();
    transport.seed(
        ZONES,
        (0..12000).map(|i| json!({"name": format!("zone-{}", i), "folder": "Texas"})),
    );

    let zones = scm.security_zone.list(&ListQuery::folder("Texas")).await.unwrap();

    assert_eq!(zones.len(), 12000);
    assert_eq!(transport.page_requests(ZONES), 5);

    let limits: Vec<String> = transport
        .requests()
        .iter()
        .filter_map(|r| r.query_param("limit").map(String::from))
        .collect();
    assert_eq!(limits, vec!["2500"; 5]);

    let mut ids: Vec<_> = zones.iter().map(|z| z.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 12000);
    assert_eq!(zones[0].name, "zone-0");
    assert_eq!(zones[11999].name, "zone-11999");
}

#[tokio::test]
async fn test_max_limit_clamped_and_rejected() {
    let (transport, mut scm) = setup();
    transport.seed(ZONES, [json!({"name": "trust", "folder": "Texas"})]);

    scm.security_zone.set_max_limit(6000).unwrap();
    assert_eq!(scm.security_zone.max_limit(), 5000);
    scm.security_zone.list(&ListQuery::folder("Texas")).await.unwrap();

    let request = transport.requests().pop().unwrap();
    assert_eq!(request.query_param("limit"), Some("5000"));

    assert!(matches!(
        scm.security_zone.set_max_limit(0),
        Err(ScmError::InvalidObject(_))
    ));
    assert!(matches!(scm.set_max_limit(-1), Err(ScmError::InvalidObject(_))));
    assert_eq!(scm.security_zone.max_limit(), 5000);

    let err = scm
        .security_zone
        .list(&ListQuery::folder("Texas").max_limit(0))
        .await
        .unwrap_err();
    assert!(matches!(err, ScmError::InvalidObject(_)));
}

#[tokio::test]
async fn test_exact_match_and_exclusions_over_inherited_folders() {
    let (transport, scm) = setup();
    transport.set_folder_parent("Texas", "All");
    transport.set_folder_parent("All", "Shared");
    transport.seed(
        ZONES,
        [
            json!({"name": "global", "folder": "Shared"}),
            json!({"name": "corp", "folder": "All"}),
            json!({"name": "trust", "folder": "Texas"}),
            json!({"name": "other", "folder": "Austin"}),
        ],
    );

    let names = |zones: Vec<scm_sdk::ConfigObject<SecurityZone>>| {
        zones.into_iter().map(|z| z.name).collect::<Vec<_>>()
    };

    let all = scm.security_zone.list(&ListQuery::folder("Texas")).await.unwrap();
    assert_eq!(names(all), vec!["global", "corp", "trust"]);

    let exact = scm
        .security_zone
        .list(&ListQuery::folder("Texas").exact_match())
        .await
        .unwrap();
    assert_eq!(names(exact), vec!["trust"]);

    let excluded = scm
        .security_zone
        .list(&ListQuery::folder("Texas").exclude_folder("All"))
        .await
        .unwrap();
    assert_eq!(names(excluded), vec!["global", "trust"]);
}

#[tokio::test]
async fn test_list_validation() {
    let (transport, scm) = setup();

    let err = scm.qos_profile.list(&ListQuery::new()).await.unwrap_err();
    assert!(matches!(err, ScmError::MissingQueryParameter(_)));

    let err = scm
        .qos_profile
        .list(&ListQuery::folder("Texas").filter("mode", ["layer3"]))
        .await
        .unwrap_err();
    assert!(matches!(err, ScmError::InvalidObject(_)));

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_server_errors_surface_unchanged() {
    let (transport, scm) = setup();
    transport.fail_next(503, json!({"message": "maintenance"}));

    let err = scm
        .security_zone
        .list(&ListQuery::folder("Texas"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScmError::Server { status: 503, .. }));
}

// =============================================================================
// Commits and jobs
// =============================================================================

#[tokio::test]
async fn test_commit_sync_waits_for_job() {
    let (transport, scm) = setup();
    transport.set_commit_polls(3);

    let result = scm
        .commit(&["Texas".to_string()], "add zones", true, 30)
        .await
        .unwrap();

    assert!(result.success);
    let job = result.job.unwrap();
    assert!(job.is_finished());
    assert!(job.finished_at().is_some());

    let polls = transport
        .requests()
        .iter()
        .filter(|r| r.method == Method::Get && r.path.contains("/jobs/"))
        .count();
    assert_eq!(polls, 3);
}

#[tokio::test]
async fn test_commit_async_and_job_queries() {
    let (transport, scm) = setup();
    transport.set_commit_polls(2);

    let result = scm
        .commit(&["Texas".to_string()], "first", false, 30)
        .await
        .unwrap();
    assert!(result.job.is_none());

    let status = scm.get_job_status(&result.job_id).await.unwrap();
    assert!(!status.is_finished());
    let status = scm.get_job_status(&result.job_id).await.unwrap();
    assert!(status.succeeded());

    scm.commit(&["Austin".to_string()], "second", false, 30)
        .await
        .unwrap();
    let jobs = scm.list_jobs(10).await.unwrap();
    assert_eq!(jobs.data.len(), 2);
    assert_eq!(jobs.data[0].description, "second");
}

#[tokio::test]
async fn test_commit_timeout() {
    let (transport, scm) = setup();
    transport.set_commit_polls(1000);

    let err = scm
        .commit(&["Texas".to_string()], "slow", true, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, ScmError::Timeout(0)));
}

#[tokio::test]
async fn test_commit_requires_folders() {
    let (transport, scm) = setup();

    let err = scm.commit(&[], "nothing", false, 30).await.unwrap_err();
    assert!(matches!(err, ScmError::InvalidObject(_)));
    assert!(transport.requests().is_empty());
}
