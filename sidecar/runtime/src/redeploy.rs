use crate::{
    core::{Component, Images, WorkspaceIdentity},
    k8s::{self, DeleteParams, ResourceExt},
    provision::create,
    topology, Cluster, ResourceSink,
};
use anyhow::{Context, Result};
use tracing::{debug, info};

/// Replaces each component's deployment with a freshly assembled one, picking
/// up new images.
///
/// A component is only redeployed when exactly one deployment carries its
/// labels; otherwise it is left alone. Services, the PVC and the exposure
/// object are never touched.
pub async fn redeploy<C>(
    cluster: &C,
    identity: &WorkspaceIdentity,
    images: &Images,
) -> Result<()>
where
    C: Cluster + ResourceSink,
{
    let ns = identity.namespace.as_str();
    for component in Component::ALL {
        let selector = component.selector(&identity.workspace_id);
        let deployments = cluster
            .list::<k8s::Deployment>(ns, &selector)
            .await
            .with_context(|| format!("failed to list deployments matching {selector}"))?;

        let [existing] = deployments.as_slice() else {
            debug!(%component, matches = deployments.len(), "Skipping redeploy");
            continue;
        };

        let name = existing.name_any();
        cluster
            .delete::<k8s::Deployment>(ns, &name, &DeleteParams::foreground().grace_period(0))
            .await
            .with_context(|| format!("failed to delete deployment {name}"))?;
        info!(%component, %name, "Deleted deployment");

        create(cluster, ns, &topology::deployment(component, identity, images)).await?;
    }

    Ok(())
}
