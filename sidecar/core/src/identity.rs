use crate::component::{Component, PFE_PVC_PREFIX};
use codewind_sidecar_k8s_api::labels::Map;

/// The object that owns every resource created for a workspace.
///
/// Deleting the owner causes the cluster to garbage-collect all of Codewind's
/// resources along with the workspace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnerRef {
    pub name: String,
    pub uid: String,
}

/// Describes the resources a Che workspace already has, as resolved from the
/// cluster before Codewind is deployed into it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkspaceIdentity {
    pub workspace_id: String,
    pub namespace: String,

    /// The claim holding the workspace's projects.
    pub storage_claim: String,

    pub service_account: String,

    /// A secret holding the workspace's registry credentials. It may not exist.
    pub registry_secret: String,

    pub owner: OwnerRef,

    /// The external hostname under which PFE is exposed.
    pub ingress_host: String,

    pub privileged: bool,
}

// === impl WorkspaceIdentity ===

impl WorkspaceIdentity {
    pub fn name(&self, component: Component) -> String {
        component.name(&self.workspace_id)
    }

    pub fn labels(&self, component: Component) -> Map {
        component.labels(&self.workspace_id)
    }

    pub fn pvc_name(&self) -> String {
        format!("{PFE_PVC_PREFIX}-{}", self.workspace_id)
    }
}
