use crate::{
    core::{ClusterInfo, Images, WorkspaceIdentity},
    k8s::ResourceExt,
    topology::{self, Exposure, Topology},
    Namespaced, ResourceSink,
};
use anyhow::{Context, Result};
use tracing::info;

/// Creates every Codewind resource for the workspace.
///
/// Resources are created one at a time and the first failure aborts the run.
/// Anything already created is left in place.
pub async fn provision<S: ResourceSink>(
    sink: &S,
    identity: &WorkspaceIdentity,
    images: &Images,
    cluster: &ClusterInfo,
) -> Result<()> {
    let ns = identity.namespace.as_str();

    sink.patch_service_account(
        ns,
        &identity.service_account,
        &topology::service_account_patch(identity),
    )
    .await
    .with_context(|| {
        format!(
            "failed to patch service account {}",
            identity.service_account
        )
    })?;
    info!(
        service_account = %identity.service_account,
        secret = %identity.registry_secret,
        "Added image pull secret"
    );

    let Topology {
        pvc,
        pfe,
        performance,
        exposure,
    } = Topology::assemble(identity, images, cluster);

    create(sink, ns, &pvc).await?;
    create(sink, ns, &pfe.service).await?;
    create(sink, ns, &pfe.deployment).await?;
    create(sink, ns, &performance.service).await?;
    create(sink, ns, &performance.deployment).await?;
    match exposure {
        Exposure::Ingress(ingress) => create(sink, ns, &ingress).await,
        Exposure::Route(route) => create(sink, ns, &route).await,
    }
}

pub(crate) async fn create<S, K>(sink: &S, ns: &str, resource: &K) -> Result<()>
where
    S: ResourceSink,
    K: Namespaced,
{
    let kind = K::kind(&());
    let name = resource.name_any();
    sink.create(ns, resource)
        .await
        .with_context(|| format!("failed to create {kind} {name}"))?;
    info!(%kind, %name, "Created");
    Ok(())
}
