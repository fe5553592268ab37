use crate::metadata::object_meta;
use codewind_sidecar_core::{ClusterInfo, Component, WorkspaceIdentity};
use codewind_sidecar_k8s_api::{
    PersistentVolumeClaim, PersistentVolumeClaimSpec, Quantity, VolumeResourceRequirements,
};

pub const PFE_VOLUME_SIZE: &str = "10Gi";

/// Returns the claim backing PFE's container storage.
pub fn pvc(identity: &WorkspaceIdentity, cluster: &ClusterInfo) -> PersistentVolumeClaim {
    PersistentVolumeClaim {
        metadata: object_meta(
            identity,
            identity.pvc_name(),
            identity.labels(Component::Pfe),
        ),
        spec: Some(PersistentVolumeClaimSpec {
            access_modes: Some(vec!["ReadWriteOnce".to_string()]),
            storage_class_name: cluster.storage_class.clone(),
            resources: Some(VolumeResourceRequirements {
                requests: Some(
                    [("storage".to_string(), Quantity(PFE_VOLUME_SIZE.to_string()))]
                        .into_iter()
                        .collect(),
                ),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}
