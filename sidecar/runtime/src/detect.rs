use crate::{
    core::{ClusterInfo, Platform},
    Cluster,
};
use anyhow::{Context, Result};
use tracing::{debug, info};

/// The IBM Cloud file storage class, used for the PFE claim when present.
pub const IBM_STORAGE_CLASS: &str = "ibmc-file-bronze";

/// Classifies the cluster by the API groups it serves.
pub async fn detect_platform<C: Cluster>(cluster: &C) -> Result<Platform> {
    let groups = cluster
        .api_groups()
        .await
        .context("failed to discover API groups")?;
    Ok(Platform::from_api_groups(groups))
}

/// Detects the platform and the storage class to use for the PFE claim.
///
/// The storage class is only a preference, so a failure to look it up leaves
/// the cluster default in place.
pub async fn detect<C: Cluster>(cluster: &C) -> Result<ClusterInfo> {
    let platform = detect_platform(cluster).await?;

    let storage_class = match cluster.storage_class(IBM_STORAGE_CLASS).await {
        Ok(class) => class.map(|_| IBM_STORAGE_CLASS.to_string()),
        Err(error) => {
            debug!(%error, class = IBM_STORAGE_CLASS, "Failed to look up storage class");
            None
        }
    };

    info!(%platform, storage_class = ?storage_class, "Detected cluster");
    Ok(ClusterInfo {
        platform,
        storage_class,
    })
}
