//! End-to-end tests through the HTTP router.
//!
//! Cluster state comes from a JSON snapshot; every request runs a full
//! extraction and aggregation cycle.

use std::io::Write;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use nodecap_accounting::{Accountant, GpuResolver};
use nodecap_api::build_router;
use nodecap_core::{ClusterConfig, ClusterSnapshot};
use nodecap_provider::SnapshotProvider;

fn two_node_cluster() -> Value {
    json!({
        "nodes": [
            {
                "name": "node-1",
                "capacity": { "cpu": "24", "memory": "5000m", "ephemeral-storage": "32000m" },
                "allocatable": { "cpu": "20", "memory": "4000m", "ephemeral-storage": "28000m" }
            },
            {
                "name": "node-2",
                "taints": [{ "key": "gpu", "value": "true", "effect": "NoSchedule" }],
                "capacity": {
                    "cpu": "16", "memory": "16000m",
                    "nvidia.com/gpu": "2", "ephemeral-storage": "32000m"
                },
                "allocatable": {
                    "cpu": "12", "memory": "12000m",
                    "nvidia.com/gpu": 2, "ephemeral-storage": "28000m"
                }
            }
        ],
        "workloads": [
            {
                "namespace": "default",
                "name": "pod-1",
                "nodeName": "node-2",
                "phase": "Running",
                "containers": [{
                    "name": "ubuntu",
                    "requests": {
                        "cpu": "4", "memory": "2",
                        "ephemeral-storage": "4000m", "nvidia.com/gpu": "1"
                    }
                }]
            },
            {
                "namespace": "default",
                "name": "pod-2",
                "nodeName": "node-2",
                "phase": "Running",
                "containers": [{
                    "name": "ubuntu",
                    "requests": { "cpu": 3, "memory": "5", "ephemeral-storage": "8500m" }
                }]
            },
            {
                "namespace": "batch",
                "name": "finished",
                "nodeName": "node-1",
                "phase": "Succeeded",
                "containers": [{ "name": "job", "requests": { "cpu": "10" } }]
            }
        ]
    })
}

fn test_router() -> axum::Router {
    let snapshot: ClusterSnapshot = serde_json::from_value(two_node_cluster()).unwrap();
    let accountant = Accountant::new(
        Arc::new(SnapshotProvider::new(snapshot)),
        GpuResolver::default(),
    );
    build_router(accountant)
}

async fn get_json(router: axum::Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = router.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn nodes_report_free_capacity() {
    let (status, body) = get_json(test_router(), "/api/v1/nodes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let nodes = body["data"].as_array().unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0]["name"], "node-1");
    assert_eq!(nodes[1]["name"], "node-2");

    let busy = &nodes[1];
    assert_eq!(busy["allocatable"]["cpu"], 12.0);
    assert_eq!(busy["allocatable"]["gpu"], 2);
    assert_eq!(busy["free"]["cpu"], 5.0);
    assert_eq!(busy["free"]["memory"], 5);
    assert_eq!(busy["free"]["ephemeral"], 16);
    assert_eq!(busy["free"]["gpu"], 1);
}

#[tokio::test]
async fn terminated_workload_is_not_counted() {
    let (_, body) = get_json(test_router(), "/api/v1/nodes/node-1").await;
    let node = &body["data"];

    assert_eq!(node["free"], node["allocatable"]);
    assert_eq!(node["free"]["cpu"], 20.0);
}

#[tokio::test]
async fn taints_render_as_list() {
    let (_, body) = get_json(test_router(), "/api/v1/nodes").await;
    let nodes = body["data"].as_array().unwrap();

    assert_eq!(nodes[0]["taints"], json!([]));
    assert_eq!(
        nodes[1]["taints"],
        json!([{ "key": "gpu", "value": "true", "effect": "NoSchedule" }])
    );
}

#[tokio::test]
async fn unknown_node_is_not_found() {
    let (status, body) = get_json(test_router(), "/api/v1/nodes/node-9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "node not found");
}

#[tokio::test]
async fn requests_are_totalled_per_node() {
    let (status, body) = get_json(test_router(), "/api/v1/requests").await;
    assert_eq!(status, StatusCode::OK);

    let totals = &body["data"];
    assert!(totals.get("node-1").is_none());
    assert_eq!(totals["node-2"]["requests"]["cpu"], "7");
    assert_eq!(totals["node-2"]["requests"]["ephemeral-storage"], "12500m");
    assert_eq!(totals["node-2"]["requests"]["nvidia.com/gpu"], "1");
}

#[tokio::test]
async fn healthz_responds() {
    let (status, body) = get_json(test_router(), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn snapshot_file_drives_the_router() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(two_node_cluster().to_string().as_bytes())
        .unwrap();

    let cluster = ClusterConfig {
        snapshot: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    let provider = nodecap_provider::connect(&cluster).await.unwrap();
    let router = build_router(Accountant::new(provider, GpuResolver::default()));

    let (status, body) = get_json(router, "/api/v1/nodes/node-2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["free"]["cpu"], 5.0);
}

#[tokio::test]
async fn missing_snapshot_file_fails_to_connect() {
    let cluster = ClusterConfig {
        snapshot: Some("/nonexistent/cluster.json".into()),
        ..Default::default()
    };
    assert!(nodecap_provider::connect(&cluster).await.is_err());
}
