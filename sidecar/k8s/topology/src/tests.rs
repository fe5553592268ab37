use super::*;
use codewind_sidecar_core::{OwnerRef, Platform};
use codewind_sidecar_k8s_api::{self as k8s, IntOrString, ResourceExt};
use maplit::{btreemap, convert_args};
use pretty_assertions::assert_eq;

const WORKSPACE_ID: &str = "workspace1erok6723m74axkg";

fn mk_identity() -> WorkspaceIdentity {
    WorkspaceIdentity {
        workspace_id: WORKSPACE_ID.to_string(),
        namespace: "che".to_string(),
        storage_claim: "claim-che-workspace".to_string(),
        service_account: "che-workspace".to_string(),
        registry_secret: format!("{WORKSPACE_ID}-private-registries"),
        owner: OwnerRef {
            name: "workspace1erok6723m74axkg.che-workspace-pod-5d4b9c".to_string(),
            uid: "c22d4a29-ba20-11e9-ac2a-005056a04e5e".to_string(),
        },
        ingress_host: "che-eclipse-che.1.2.3.4.nip.io".to_string(),
        privileged: true,
    }
}

fn mk_cluster(platform: Platform) -> ClusterInfo {
    ClusterInfo {
        platform,
        storage_class: None,
    }
}

fn assemble(platform: Platform) -> Topology {
    Topology::assemble(&mk_identity(), &Images::default(), &mk_cluster(platform))
}

fn env_value<'a>(deployment: &'a k8s::Deployment, name: &str) -> Option<&'a str> {
    deployment.spec.as_ref()?.template.spec.as_ref()?.containers[0]
        .env
        .as_ref()?
        .iter()
        .find(|e| e.name == name)?
        .value
        .as_deref()
}

fn pod_spec(deployment: &k8s::Deployment) -> &k8s::PodSpec {
    deployment
        .spec
        .as_ref()
        .and_then(|s| s.template.spec.as_ref())
        .expect("deployment must have a pod spec")
}

#[test]
fn names_are_deterministic() {
    let a = assemble(Platform::Standard);
    let b = assemble(Platform::Standard);
    assert_eq!(a, b);

    assert_eq!(a.pfe.deployment.name_any(), format!("codewind-{WORKSPACE_ID}"));
    assert_eq!(a.pfe.service.name_any(), format!("codewind-{WORKSPACE_ID}"));
    assert_eq!(
        a.exposure.metadata().name.as_deref(),
        Some(format!("codewind-{WORKSPACE_ID}").as_str())
    );
    assert_eq!(
        a.performance.deployment.name_any(),
        format!("codewind-performance-{WORKSPACE_ID}")
    );
    assert_eq!(
        a.performance.service.name_any(),
        format!("codewind-performance-{WORKSPACE_ID}")
    );
    assert_eq!(a.pvc.name_any(), format!("codewind-pfe-pvc-{WORKSPACE_ID}"));
}

#[test]
fn every_resource_is_owned_by_the_workspace() {
    let identity = mk_identity();
    for platform in [Platform::Standard, Platform::Legacy] {
        let topology = assemble(platform);
        let metas = [
            &topology.pvc.metadata,
            &topology.pfe.deployment.metadata,
            &topology.pfe.service.metadata,
            &topology.performance.deployment.metadata,
            &topology.performance.service.metadata,
            topology.exposure.metadata(),
        ];
        for meta in metas {
            let owners = meta.owner_references.as_deref().unwrap_or_default();
            assert_eq!(owners.len(), 1, "{:?} must have one owner", meta.name);
            let owner = &owners[0];
            assert_eq!(owner.name, identity.owner.name);
            assert_eq!(owner.uid, identity.owner.uid);
            assert_eq!(owner.kind, "ReplicaSet");
            assert_eq!(owner.api_version, "apps/v1");
            assert_eq!(owner.controller, Some(true));
            assert_eq!(owner.block_owner_deletion, Some(true));
            assert_eq!(meta.namespace.as_deref(), Some("che"));
        }
    }
}

#[test]
fn service_selects_deployment_pods() {
    let topology = assemble(Platform::Standard);
    for component in Component::ALL {
        let Workload {
            deployment,
            service,
        } = topology.workload(component);
        let spec = deployment.spec.as_ref().expect("deployment must have a spec");
        let pod_labels = spec
            .template
            .metadata
            .as_ref()
            .and_then(|m| m.labels.as_ref())
            .expect("pod template must be labeled");
        let selector = service
            .spec
            .as_ref()
            .and_then(|s| s.selector.as_ref())
            .expect("service must have a selector");

        assert_eq!(selector, pod_labels);
        assert_eq!(spec.selector.match_labels.as_ref(), Some(pod_labels));
        assert_eq!(
            *pod_labels,
            convert_args!(btreemap!(
                "app" => component.app(),
                "codewindWorkspace" => WORKSPACE_ID,
            ))
        );
        assert!(component.selector(WORKSPACE_ID).matches(pod_labels));
    }
}

#[test]
fn services_expose_component_ports() {
    let topology = assemble(Platform::Standard);
    for (component, port, name) in [
        (Component::Pfe, 9191, "codewind-http"),
        (Component::Performance, 9095, "codewind-performance-http"),
    ] {
        let ports = topology
            .workload(component)
            .service
            .spec
            .as_ref()
            .and_then(|s| s.ports.clone())
            .unwrap_or_default();
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].port, port);
        assert_eq!(ports[0].name.as_deref(), Some(name));

        let container = &pod_spec(&topology.workload(component).deployment).containers[0];
        let container_ports = container.ports.clone().unwrap_or_default();
        assert_eq!(container_ports.len(), 1);
        assert_eq!(container_ports[0].container_port, port);
    }
}

#[test]
fn deployments_run_one_privileged_container() {
    let identity = mk_identity();
    let images = Images::new("registry.example.com/pfe", "0.5", "", "");
    let topology = Topology::assemble(&identity, &images, &mk_cluster(Platform::Standard));

    for component in Component::ALL {
        let deployment = &topology.workload(component).deployment;
        assert_eq!(deployment.spec.as_ref().and_then(|s| s.replicas), Some(1));

        let spec = pod_spec(deployment);
        assert_eq!(spec.containers.len(), 1);
        assert_eq!(spec.service_account_name.as_deref(), Some("che-workspace"));

        let container = &spec.containers[0];
        assert_eq!(container.name, component.prefix());
        assert_eq!(container.image.as_deref(), Some(images.get(component)));
        assert_eq!(container.image_pull_policy.as_deref(), Some("Always"));
        assert_eq!(
            container.security_context.as_ref().and_then(|s| s.privileged),
            Some(true)
        );
    }
    assert_eq!(
        pod_spec(&topology.pfe.deployment).containers[0].image.as_deref(),
        Some("registry.example.com/pfe:0.5")
    );
}

#[test]
fn pfe_environment() {
    let identity = mk_identity();
    let topology = assemble(Platform::Standard);
    let pfe = &topology.pfe.deployment;

    assert_eq!(env_value(pfe, "KUBE_NAMESPACE"), pfe.metadata.namespace.as_deref());
    assert_eq!(env_value(pfe, "TILLER_NAMESPACE"), pfe.metadata.namespace.as_deref());
    assert_eq!(env_value(pfe, "CHE_WORKSPACE_ID"), Some(WORKSPACE_ID));
    assert_eq!(env_value(pfe, "PVC_NAME"), Some("claim-che-workspace"));
    assert_eq!(
        env_value(pfe, "SERVICE_ACCOUNT_NAME"),
        pod_spec(pfe).service_account_name.as_deref()
    );
    assert_eq!(
        env_value(pfe, "SERVICE_NAME"),
        topology.pfe.service.metadata.name.as_deref()
    );
    assert_eq!(
        env_value(pfe, "CODEWIND_PERFORMANCE_SERVICE"),
        topology.performance.service.metadata.name.as_deref()
    );
    assert_eq!(
        env_value(pfe, "OWNER_REF_NAME"),
        Some(identity.owner.name.as_str())
    );
    assert_eq!(
        env_value(pfe, "OWNER_REF_UID"),
        Some(identity.owner.uid.as_str())
    );
    assert_eq!(
        env_value(pfe, "CHE_INGRESS_HOST"),
        Some(identity.ingress_host.as_str())
    );
    assert_eq!(env_value(pfe, "HOST_WORKSPACE_DIRECTORY"), Some("/projects"));
    assert_eq!(
        env_value(pfe, "CONTAINER_WORKSPACE_DIRECTORY"),
        Some("/codewind-workspace")
    );
    assert_eq!(
        env_value(pfe, "MICROCLIMATE_RELEASE_NAME"),
        Some("RELEASE-NAME")
    );
}

#[test]
fn performance_environment() {
    let topology = assemble(Platform::Standard);
    let perf = &topology.performance.deployment;
    let names = pod_spec(perf).containers[0]
        .env
        .iter()
        .flatten()
        .map(|e| e.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, ["IN_K8", "PORTAL_HTTPS", "CODEWIND_INGRESS"]);
    assert_eq!(env_value(perf, "PORTAL_HTTPS"), Some("false"));
    assert_eq!(
        env_value(perf, "CODEWIND_INGRESS"),
        Some("che-eclipse-che.1.2.3.4.nip.io")
    );
    assert!(pod_spec(perf).volumes.iter().flatten().next().is_none());
}

#[test]
fn pfe_volumes() {
    let identity = mk_identity();
    let topology = assemble(Platform::Standard);
    let spec = pod_spec(&topology.pfe.deployment);
    let volumes = spec.volumes.clone().unwrap_or_default();
    assert_eq!(volumes.len(), 3);

    let workspace = volumes[0].persistent_volume_claim.as_ref().unwrap();
    assert_eq!(workspace.claim_name, identity.storage_claim);

    let buildah = volumes[1].persistent_volume_claim.as_ref().unwrap();
    assert_eq!(buildah.claim_name, topology.pvc.name_any());

    let secret = volumes[2].secret.as_ref().unwrap();
    assert_eq!(secret.secret_name.as_deref(), Some(identity.registry_secret.as_str()));
    assert_eq!(secret.optional, Some(true));
    assert_eq!(secret.default_mode, Some(0o777));

    let mounts = spec.containers[0].volume_mounts.clone().unwrap_or_default();
    let mounts = mounts
        .iter()
        .map(|m| (m.name.as_str(), m.mount_path.as_str(), m.sub_path.as_deref()))
        .collect::<Vec<_>>();
    let sub_path = format!("{WORKSPACE_ID}/projects");
    assert_eq!(
        mounts,
        [
            ("shared-workspace", "/codewind-workspace", Some(sub_path.as_str())),
            ("buildah-volume", "/var/lib/containers", None),
            ("registry-secret", "/tmp/secret", None),
        ]
    );
}

#[test]
fn pvc_uses_detected_storage_class() {
    let identity = mk_identity();
    let cluster = ClusterInfo {
        platform: Platform::Standard,
        storage_class: Some("ibmc-file-bronze".to_string()),
    };
    let claim = pvc(&identity, &cluster);
    let spec = claim.spec.as_ref().unwrap();
    assert_eq!(spec.storage_class_name.as_deref(), Some("ibmc-file-bronze"));
    assert_eq!(spec.access_modes.as_deref(), Some(&["ReadWriteOnce".to_string()][..]));
    let requests = spec.resources.as_ref().and_then(|r| r.requests.as_ref()).unwrap();
    assert_eq!(requests["storage"].0, PFE_VOLUME_SIZE);

    let default = pvc(&identity, &mk_cluster(Platform::Standard));
    assert_eq!(default.spec.unwrap().storage_class_name, None);
}

#[test]
fn standard_clusters_get_an_ingress() {
    let identity = mk_identity();
    let topology = assemble(Platform::Standard);
    let Exposure::Ingress(ingress) = &topology.exposure else {
        panic!("expected an ingress, got {:?}", topology.exposure);
    };
    assert_eq!(topology.exposure.host(), Some(identity.ingress_host.as_str()));

    let rules = ingress.spec.as_ref().and_then(|s| s.rules.clone()).unwrap();
    assert_eq!(rules.len(), 1);
    let paths = rules[0].http.as_ref().unwrap().paths.clone();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].path.as_deref(), Some("/"));
    let backend = paths[0].backend.service.as_ref().unwrap();
    assert_eq!(backend.name, topology.pfe.service.name_any());
    assert_eq!(backend.port.as_ref().and_then(|p| p.number), Some(9191));

    let annotations = ingress.metadata.annotations.clone().unwrap_or_default();
    assert_eq!(
        annotations.get("nginx.ingress.kubernetes.io/backend-protocol").map(String::as_str),
        Some("HTTPS")
    );
}

#[test]
fn legacy_clusters_get_a_route() {
    use k8s::route::{InsecureEdgeTerminationPolicy, TlsTermination};

    let identity = mk_identity();
    let topology = assemble(Platform::Legacy);
    let Exposure::Route(route) = &topology.exposure else {
        panic!("expected a route, got {:?}", topology.exposure);
    };
    assert_eq!(topology.exposure.host(), Some(identity.ingress_host.as_str()));
    assert_eq!(route.spec.to.kind, "Service");
    assert_eq!(route.spec.to.name, topology.pfe.service.name_any());
    assert_eq!(
        route.spec.port.as_ref().map(|p| &p.target_port),
        Some(&IntOrString::Int(9191))
    );
    let tls = route.spec.tls.as_ref().unwrap();
    assert_eq!(tls.termination, TlsTermination::Passthrough);
    assert_eq!(
        tls.insecure_edge_termination_policy,
        Some(InsecureEdgeTerminationPolicy::Redirect)
    );
}

#[test]
fn patches_registry_secret_into_service_account() {
    assert_eq!(
        service_account_patch(&mk_identity()),
        serde_json::json!({
            "imagePullSecrets": [{ "name": format!("{WORKSPACE_ID}-private-registries") }]
        })
    );
}
