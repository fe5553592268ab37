use codewind_sidecar_core::{OwnerRef, WorkspaceIdentity};
use codewind_sidecar_k8s_api::{labels::Map, ObjectMeta, OwnerReference};

/// Che workspace pods are owned by a ReplicaSet, which in turn owns Codewind.
pub const OWNER_API_VERSION: &str = "apps/v1";
pub const OWNER_KIND: &str = "ReplicaSet";

pub fn owner_reference(owner: &OwnerRef) -> OwnerReference {
    OwnerReference {
        api_version: OWNER_API_VERSION.to_string(),
        kind: OWNER_KIND.to_string(),
        name: owner.name.clone(),
        uid: owner.uid.clone(),
        block_owner_deletion: Some(true),
        controller: Some(true),
    }
}

/// Metadata shared by all top-level resources: the workspace namespace, the
/// given labels, and exactly one owner reference to the workspace owner.
pub(crate) fn object_meta(identity: &WorkspaceIdentity, name: String, labels: Map) -> ObjectMeta {
    ObjectMeta {
        name: Some(name),
        namespace: Some(identity.namespace.clone()),
        labels: Some(labels),
        owner_references: Some(vec![owner_reference(&identity.owner)]),
        ..Default::default()
    }
}
