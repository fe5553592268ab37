//! Locates the Che workspace objects that Codewind's resources depend on.
//!
//! Che does not record these objects anywhere Codewind can read directly, so
//! each is found by label. Lookups that find nothing usable fall back to the
//! names Che uses by default.

use crate::{
    core::{OwnerRef, WorkspaceIdentity},
    k8s::{self, ResourceExt, Selector},
    Cluster, Namespaced,
};
use anyhow::{Context, Result};
use tracing::{debug, info};

pub const WORKSPACE_ID_LABEL: &str = "che.workspace_id";
pub const VOLUME_NAME_LABEL: &str = "che.workspace.volume_name";
pub const ORIGINAL_NAME_LABEL: &str = "che.original_name";

const PROJECTS_VOLUME: &str = "projects";
const WORKSPACE_POD: &str = "che-workspace-pod";

pub const DEFAULT_STORAGE_CLAIM: &str = "claim-che-workspace";
pub const DEFAULT_SERVICE_ACCOUNT: &str = "che-workspace";
const REGISTRY_SECRET_SUFFIX: &str = "private-registries";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("workspace ID must not be empty")]
    MissingWorkspaceId,

    #[error("no workspace pod found for workspace {0}")]
    NoWorkspacePod(String),

    #[error("workspace pod {0} has no owner reference")]
    NoOwnerReference(String),
}

/// How a value is chosen from the objects matching a selector.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pick {
    /// The first object in list order.
    First,
    /// The only matching object. Several matches are treated as none.
    Unique,
}

/// A label lookup that falls back to a secondary selector and then to a
/// default value.
#[derive(Clone, Debug)]
pub struct Lookup {
    pub primary: Selector,
    pub secondary: Option<Selector>,
    pub default: String,
    pub pick: Pick,
}

// === impl Pick ===

impl Pick {
    pub fn pick<T>(self, items: &[T]) -> Option<&T> {
        match (self, items) {
            (Self::First, items) => items.first(),
            (Self::Unique, [item]) => Some(item),
            (Self::Unique, _) => None,
        }
    }
}

// === impl Lookup ===

impl Lookup {
    /// Lists `K` with each selector in turn, returning the value extracted from
    /// the picked object. Failing to list is an error; finding nothing is not.
    pub async fn resolve<K, C, F>(&self, cluster: &C, ns: &str, value: F) -> Result<String>
    where
        K: Namespaced,
        C: Cluster,
        F: Fn(&K) -> Option<String>,
    {
        let kind = K::kind(&());
        for selector in std::iter::once(&self.primary).chain(self.secondary.as_ref()) {
            let items = cluster
                .list::<K>(ns, selector)
                .await
                .with_context(|| format!("failed to list {kind} matching {selector}"))?;
            if let Some(found) = self.pick.pick(&items).and_then(&value) {
                return Ok(found);
            }
            debug!(%kind, %selector, matches = items.len(), "No usable match");
        }

        debug!(%kind, default = %self.default, "Falling back to default");
        Ok(self.default.clone())
    }
}

fn workspace_selector(workspace_id: &str) -> Selector {
    Selector::from_iter(Some((WORKSPACE_ID_LABEL, workspace_id)))
}

fn workspace_pod_selector(workspace_id: &str) -> Selector {
    Selector::from_iter([
        (ORIGINAL_NAME_LABEL, WORKSPACE_POD),
        (WORKSPACE_ID_LABEL, workspace_id),
    ])
}

/// Finds the claim holding the workspace's projects.
pub async fn resolve_storage_claim<C: Cluster>(
    cluster: &C,
    ns: &str,
    workspace_id: &str,
) -> Result<String> {
    let lookup = Lookup {
        primary: Selector::from_iter([
            (VOLUME_NAME_LABEL, PROJECTS_VOLUME),
            (WORKSPACE_ID_LABEL, workspace_id),
        ]),
        secondary: Some(workspace_selector(workspace_id)),
        default: DEFAULT_STORAGE_CLAIM.to_string(),
        pick: Pick::First,
    };
    lookup
        .resolve(cluster, ns, |pvc: &k8s::PersistentVolumeClaim| {
            pvc.metadata.name.clone()
        })
        .await
}

/// Finds the service account the workspace pod runs as.
pub async fn resolve_service_account<C: Cluster>(
    cluster: &C,
    ns: &str,
    workspace_id: &str,
) -> Result<String> {
    let lookup = Lookup {
        primary: workspace_pod_selector(workspace_id),
        secondary: None,
        default: DEFAULT_SERVICE_ACCOUNT.to_string(),
        pick: Pick::Unique,
    };
    lookup
        .resolve(cluster, ns, |pod: &k8s::Pod| {
            pod.spec
                .as_ref()?
                .service_account_name
                .clone()
                .filter(|name| !name.is_empty())
        })
        .await
}

/// Finds the secret holding the workspace's registry credentials.
///
/// The default name is used even though the secret may not exist; it is
/// mounted optionally.
pub async fn resolve_registry_secret<C: Cluster>(
    cluster: &C,
    ns: &str,
    workspace_id: &str,
) -> Result<String> {
    let lookup = Lookup {
        primary: workspace_selector(workspace_id),
        secondary: None,
        default: format!("{workspace_id}-{REGISTRY_SECRET_SUFFIX}"),
        pick: Pick::Unique,
    };
    lookup
        .resolve(cluster, ns, |secret: &k8s::Secret| {
            secret.metadata.name.clone()
        })
        .await
}

/// Returns the controller of the workspace pod, which becomes the owner of
/// every resource Codewind creates.
pub async fn resolve_owner_reference<C: Cluster>(
    cluster: &C,
    ns: &str,
    workspace_id: &str,
) -> Result<OwnerRef> {
    let selector = workspace_pod_selector(workspace_id);
    let pods = cluster
        .list::<k8s::Pod>(ns, &selector)
        .await
        .with_context(|| format!("failed to list pods matching {selector}"))?;
    let pod = pods
        .first()
        .ok_or_else(|| Error::NoWorkspacePod(workspace_id.to_string()))?;
    let owner = pod
        .owner_references()
        .first()
        .ok_or_else(|| Error::NoOwnerReference(pod.name_any()))?;
    Ok(OwnerRef {
        name: owner.name.clone(),
        uid: owner.uid.clone(),
    })
}

/// Resolves everything Codewind needs to know about the workspace.
pub async fn resolve<C: Cluster>(
    cluster: &C,
    ns: &str,
    workspace_id: &str,
    ingress_host: String,
) -> Result<WorkspaceIdentity> {
    if workspace_id.is_empty() {
        return Err(Error::MissingWorkspaceId.into());
    }

    let storage_claim = resolve_storage_claim(cluster, ns, workspace_id).await?;
    let service_account = resolve_service_account(cluster, ns, workspace_id).await?;
    let registry_secret = resolve_registry_secret(cluster, ns, workspace_id).await?;
    let owner = resolve_owner_reference(cluster, ns, workspace_id).await?;
    info!(
        %workspace_id,
        %storage_claim,
        %service_account,
        %registry_secret,
        owner = %owner.name,
        "Resolved workspace"
    );

    Ok(WorkspaceIdentity {
        workspace_id: workspace_id.to_string(),
        namespace: ns.to_string(),
        storage_claim,
        service_account,
        registry_secret,
        owner,
        ingress_host,
        privileged: true,
    })
}
