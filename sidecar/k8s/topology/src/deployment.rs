use crate::metadata::object_meta;
use codewind_sidecar_core::{Component, Images, WorkspaceIdentity};
use codewind_sidecar_k8s_api::{
    Container, ContainerPort, Deployment, DeploymentSpec, EnvVar, LabelSelector, ObjectMeta,
    PersistentVolumeClaimVolumeSource, PodSpec, PodTemplateSpec, SecretVolumeSource,
    SecurityContext, Volume, VolumeMount,
};

const IMAGE_PULL_POLICY: &str = "Always";

const HOST_WORKSPACE_DIRECTORY: &str = "/projects";
const CONTAINER_WORKSPACE_DIRECTORY: &str = "/codewind-workspace";
const CONTAINER_STORAGE_DIRECTORY: &str = "/var/lib/containers";
const REGISTRY_SECRET_DIRECTORY: &str = "/tmp/secret";

const SHARED_WORKSPACE_VOLUME: &str = "shared-workspace";
const BUILDAH_VOLUME: &str = "buildah-volume";
const REGISTRY_SECRET_VOLUME: &str = "registry-secret";

// 0777
const REGISTRY_SECRET_MODE: i32 = 511;

/// Returns the deployment running a single privileged container for the
/// component.
///
/// The pod template is labeled with the component labels, which the
/// deployment selector and the component's service both match.
pub fn deployment(
    component: Component,
    identity: &WorkspaceIdentity,
    images: &Images,
) -> Deployment {
    let labels = identity.labels(component);
    let (volumes, volume_mounts) = match component {
        Component::Pfe => pfe_volumes(identity),
        Component::Performance => (vec![], vec![]),
    };
    let env = match component {
        Component::Pfe => pfe_env(identity),
        Component::Performance => performance_env(identity),
    };

    let container = Container {
        name: component.prefix().to_string(),
        image: Some(images.get(component).to_string()),
        image_pull_policy: Some(IMAGE_PULL_POLICY.to_string()),
        security_context: Some(SecurityContext {
            privileged: Some(identity.privileged),
            ..Default::default()
        }),
        volume_mounts: Some(volume_mounts),
        env: Some(env),
        ports: Some(vec![ContainerPort {
            container_port: component.port().into(),
            ..Default::default()
        }]),
        ..Default::default()
    };

    Deployment {
        metadata: object_meta(identity, identity.name(component), labels.clone()),
        spec: Some(DeploymentSpec {
            replicas: Some(1),
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    service_account_name: Some(identity.service_account.clone()),
                    volumes: Some(volumes),
                    containers: vec![container],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// PFE mounts the workspace projects, its own container storage and the
/// (optional) registry secret.
fn pfe_volumes(identity: &WorkspaceIdentity) -> (Vec<Volume>, Vec<VolumeMount>) {
    let volumes = vec![
        Volume {
            name: SHARED_WORKSPACE_VOLUME.to_string(),
            persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                claim_name: identity.storage_claim.clone(),
                ..Default::default()
            }),
            ..Default::default()
        },
        Volume {
            name: BUILDAH_VOLUME.to_string(),
            persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                claim_name: identity.pvc_name(),
                ..Default::default()
            }),
            ..Default::default()
        },
        Volume {
            name: REGISTRY_SECRET_VOLUME.to_string(),
            secret: Some(SecretVolumeSource {
                default_mode: Some(REGISTRY_SECRET_MODE),
                secret_name: Some(identity.registry_secret.clone()),
                // The fallback secret name may not exist.
                optional: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        },
    ];

    let volume_mounts = vec![
        VolumeMount {
            name: SHARED_WORKSPACE_VOLUME.to_string(),
            mount_path: CONTAINER_WORKSPACE_DIRECTORY.to_string(),
            sub_path: Some(format!("{}/projects", identity.workspace_id)),
            ..Default::default()
        },
        VolumeMount {
            name: BUILDAH_VOLUME.to_string(),
            mount_path: CONTAINER_STORAGE_DIRECTORY.to_string(),
            ..Default::default()
        },
        VolumeMount {
            name: REGISTRY_SECRET_VOLUME.to_string(),
            mount_path: REGISTRY_SECRET_DIRECTORY.to_string(),
            ..Default::default()
        },
    ];

    (volumes, volume_mounts)
}

fn pfe_env(identity: &WorkspaceIdentity) -> Vec<EnvVar> {
    vec![
        env("TEKTON_PIPELINE", "tekton-pipelines"),
        env("IN_K8", "true"),
        env("PORTAL_HTTPS", "true"),
        env("KUBE_NAMESPACE", &identity.namespace),
        env("TILLER_NAMESPACE", &identity.namespace),
        env("CHE_WORKSPACE_ID", &identity.workspace_id),
        env("PVC_NAME", &identity.storage_claim),
        env("SERVICE_NAME", identity.name(Component::Pfe)),
        env("SERVICE_ACCOUNT_NAME", &identity.service_account),
        env("MICROCLIMATE_RELEASE_NAME", "RELEASE-NAME"),
        env("HOST_WORKSPACE_DIRECTORY", HOST_WORKSPACE_DIRECTORY),
        env("CONTAINER_WORKSPACE_DIRECTORY", CONTAINER_WORKSPACE_DIRECTORY),
        env("OWNER_REF_NAME", &identity.owner.name),
        env("OWNER_REF_UID", &identity.owner.uid),
        env(
            "CODEWIND_PERFORMANCE_SERVICE",
            identity.name(Component::Performance),
        ),
        env("CHE_INGRESS_HOST", &identity.ingress_host),
    ]
}

fn performance_env(identity: &WorkspaceIdentity) -> Vec<EnvVar> {
    vec![
        env("IN_K8", "true"),
        env("PORTAL_HTTPS", "false"),
        env("CODEWIND_INGRESS", &identity.ingress_host),
    ]
}

fn env(name: &str, value: impl Into<String>) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: Some(value.into()),
        ..Default::default()
    }
}
