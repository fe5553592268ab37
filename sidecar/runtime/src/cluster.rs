use crate::k8s::{self, Api, DeleteParams, NamespaceResourceScope, ResourceExt, Selector};
use anyhow::Result;
use kube::{
    api::{ListParams, Patch, PatchParams, PostParams},
    runtime::wait::{await_condition, conditions},
};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use tracing::debug;

const FIELD_MANAGER: &str = "codewind-sidecar";

/// A namespaced resource type that can be listed, created and deleted.
pub trait Namespaced:
    kube::Resource<DynamicType = (), Scope = NamespaceResourceScope>
    + Clone
    + Debug
    + DeserializeOwned
    + Serialize
    + Send
    + Sync
    + 'static
{
}

impl<K> Namespaced for K where
    K: kube::Resource<DynamicType = (), Scope = NamespaceResourceScope>
        + Clone
        + Debug
        + DeserializeOwned
        + Serialize
        + Send
        + Sync
        + 'static
{
}

/// Reads the cluster state from which a workspace's configuration is derived.
#[async_trait::async_trait]
pub trait Cluster: Send + Sync {
    /// Names of all API groups served by the cluster.
    async fn api_groups(&self) -> Result<Vec<String>>;

    async fn storage_class(&self, name: &str) -> Result<Option<k8s::StorageClass>>;

    /// Lists the resources in `ns` matching `selector`, in the order returned by
    /// the API server.
    async fn list<K: Namespaced>(&self, ns: &str, selector: &Selector) -> Result<Vec<K>>;
}

/// Persists resource descriptions to the cluster.
#[async_trait::async_trait]
pub trait ResourceSink: Send + Sync {
    async fn create<K: Namespaced>(&self, ns: &str, resource: &K) -> Result<()>;

    /// Deletes a resource, returning once it no longer exists.
    async fn delete<K: Namespaced>(&self, ns: &str, name: &str, params: &DeleteParams)
        -> Result<()>;

    /// Applies a strategic merge patch to a service account.
    async fn patch_service_account(
        &self,
        ns: &str,
        name: &str,
        patch: &serde_json::Value,
    ) -> Result<()>;
}

/// Talks to the Kubernetes API server.
#[derive(Clone)]
pub struct KubeCluster {
    client: k8s::Client,
}

// === impl KubeCluster ===

impl KubeCluster {
    pub fn new(client: k8s::Client) -> Self {
        Self { client }
    }

    /// The namespace of the client's current context.
    pub fn default_namespace(&self) -> &str {
        self.client.default_namespace()
    }
}

#[async_trait::async_trait]
impl Cluster for KubeCluster {
    async fn api_groups(&self) -> Result<Vec<String>> {
        let list = self.client.list_api_groups().await?;
        Ok(list.groups.into_iter().map(|g| g.name).collect())
    }

    async fn storage_class(&self, name: &str) -> Result<Option<k8s::StorageClass>> {
        let api = Api::<k8s::StorageClass>::all(self.client.clone());
        Ok(api.get_opt(name).await?)
    }

    async fn list<K: Namespaced>(&self, ns: &str, selector: &Selector) -> Result<Vec<K>> {
        let api = Api::<K>::namespaced(self.client.clone(), ns);
        let params = ListParams::default().labels(&selector.to_string());
        Ok(api.list(&params).await?.items)
    }
}

#[async_trait::async_trait]
impl ResourceSink for KubeCluster {
    async fn create<K: Namespaced>(&self, ns: &str, resource: &K) -> Result<()> {
        let api = Api::<K>::namespaced(self.client.clone(), ns);
        let params = PostParams {
            field_manager: Some(FIELD_MANAGER.to_string()),
            ..Default::default()
        };
        api.create(&params, resource).await?;
        Ok(())
    }

    async fn delete<K: Namespaced>(
        &self,
        ns: &str,
        name: &str,
        params: &DeleteParams,
    ) -> Result<()> {
        let api = Api::<K>::namespaced(self.client.clone(), ns);

        // Foreground deletion returns while the object is still being
        // finalized, and a replacement with the same name can only be created
        // once it is gone.
        if let Some(pending) = api.delete(name, params).await?.left() {
            let uid = pending.uid().unwrap_or_default();
            debug!(%ns, %name, "Waiting for deletion to complete");
            await_condition(api, name, conditions::is_deleted(&uid)).await?;
        }
        Ok(())
    }

    async fn patch_service_account(
        &self,
        ns: &str,
        name: &str,
        patch: &serde_json::Value,
    ) -> Result<()> {
        let api = Api::<k8s::ServiceAccount>::namespaced(self.client.clone(), ns);
        let params = PatchParams {
            field_manager: Some(FIELD_MANAGER.to_string()),
            ..Default::default()
        };
        api.patch(name, &params, &Patch::Strategic(patch)).await?;
        Ok(())
    }
}
