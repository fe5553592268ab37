//! Builds the Kubernetes resources that make up a Codewind deployment.
//!
//! Nothing here talks to the cluster: every function maps a resolved
//! [`WorkspaceIdentity`] onto resource descriptions that are created by the
//! caller.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod deployment;
mod exposure;
mod metadata;
mod pvc;
mod service;

#[cfg(test)]
mod tests;

pub use self::{
    deployment::deployment,
    exposure::{exposure, ingress, route, Exposure},
    metadata::{owner_reference, OWNER_API_VERSION, OWNER_KIND},
    pvc::{pvc, PFE_VOLUME_SIZE},
    service::service,
};
use codewind_sidecar_core::{ClusterInfo, Component, Images, WorkspaceIdentity};
use codewind_sidecar_k8s_api as k8s;

/// Every resource created for a single workspace.
#[derive(Clone, Debug, PartialEq)]
pub struct Topology {
    pub pvc: k8s::PersistentVolumeClaim,
    pub pfe: Workload,
    pub performance: Workload,
    pub exposure: Exposure,
}

/// A component's deployment and the service selecting its pods.
#[derive(Clone, Debug, PartialEq)]
pub struct Workload {
    pub deployment: k8s::Deployment,
    pub service: k8s::Service,
}

// === impl Topology ===

impl Topology {
    pub fn assemble(
        identity: &WorkspaceIdentity,
        images: &Images,
        cluster: &ClusterInfo,
    ) -> Self {
        Self {
            pvc: pvc(identity, cluster),
            pfe: Workload::new(Component::Pfe, identity, images),
            performance: Workload::new(Component::Performance, identity, images),
            exposure: exposure(identity, cluster.platform),
        }
    }

    #[cfg(test)]
    pub(crate) fn workload(&self, component: Component) -> &Workload {
        match component {
            Component::Pfe => &self.pfe,
            Component::Performance => &self.performance,
        }
    }
}

// === impl Workload ===

impl Workload {
    pub fn new(component: Component, identity: &WorkspaceIdentity, images: &Images) -> Self {
        Self {
            deployment: deployment(component, identity, images),
            service: service(component, identity),
        }
    }
}

/// The strategic merge patch that adds the workspace registry secret to the
/// workspace service account's image pull secrets.
pub fn service_account_patch(identity: &WorkspaceIdentity) -> serde_json::Value {
    serde_json::json!({
        "imagePullSecrets": [
            { "name": identity.registry_secret },
        ],
    })
}
