use crate::{core::Component, k8s, Cluster};
use anyhow::{Context, Result};

/// Returns the name of the PFE service already deployed for the workspace, if
/// any.
pub async fn existing_service<C: Cluster>(
    cluster: &C,
    ns: &str,
    workspace_id: &str,
) -> Result<Option<String>> {
    let selector = Component::Pfe.selector(workspace_id);
    let services = cluster
        .list::<k8s::Service>(ns, &selector)
        .await
        .with_context(|| format!("failed to list services matching {selector}"))?;
    Ok(services.into_iter().find_map(|svc| svc.metadata.name))
}
