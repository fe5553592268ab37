use super::*;
use crate::{
    core::{ClusterInfo, Images, Platform},
    provision::provision,
};
use pretty_assertions::assert_eq;

fn cluster_info(platform: Platform) -> ClusterInfo {
    ClusterInfo {
        platform,
        storage_class: None,
    }
}

#[tokio::test]
async fn creates_resources_in_order() {
    let _tracing = init_tracing();
    let cluster = FakeCluster::default();
    provision(
        &cluster,
        &mk_identity(),
        &Images::default(),
        &cluster_info(Platform::Standard),
    )
    .await
    .expect("provisioning must succeed");

    assert_eq!(
        cluster.ops(),
        vec![
            Op::Patch {
                name: "che-workspace".to_string(),
                patch: serde_json::json!({
                    "imagePullSecrets": [{ "name": "workspace1-private-registries" }],
                }),
            },
            create("PersistentVolumeClaim", "codewind-pfe-pvc-workspace1"),
            create("Service", "codewind-workspace1"),
            create("Deployment", "codewind-workspace1"),
            create("Service", "codewind-performance-workspace1"),
            create("Deployment", "codewind-performance-workspace1"),
            create("Ingress", "codewind-workspace1"),
        ]
    );
}

#[tokio::test]
async fn exposes_legacy_clusters_with_route() {
    let cluster = FakeCluster::default();
    provision(
        &cluster,
        &mk_identity(),
        &Images::default(),
        &cluster_info(Platform::Legacy),
    )
    .await
    .expect("provisioning must succeed");

    let ops = cluster.ops();
    assert_eq!(ops.last(), Some(&create("Route", "codewind-workspace1")));
    assert!(!ops
        .iter()
        .any(|op| matches!(op, Op::Create { kind, .. } if kind == "Ingress")));

    let route = cluster
        .get::<k8s::Route>("codewind-workspace1")
        .expect("route must be stored");
    assert_eq!(route.spec.host.as_deref(), Some("che.example.com"));
}

#[tokio::test]
async fn stops_at_first_failure() {
    let cluster = FakeCluster {
        fail_create: Some("Deployment"),
        ..Default::default()
    };
    let error = provision(
        &cluster,
        &mk_identity(),
        &Images::default(),
        &cluster_info(Platform::Standard),
    )
    .await
    .expect_err("provisioning must fail");
    assert_eq!(
        error.to_string(),
        "failed to create Deployment codewind-workspace1"
    );

    // Nothing is rolled back.
    assert_eq!(
        cluster.names::<k8s::PersistentVolumeClaim>(),
        vec!["codewind-pfe-pvc-workspace1".to_string()]
    );
    assert_eq!(
        cluster.names::<k8s::Service>(),
        vec!["codewind-workspace1".to_string()]
    );
    assert!(cluster.names::<k8s::Deployment>().is_empty());
    assert!(cluster.names::<k8s::Ingress>().is_empty());
}
