use crate::error::{AppError, Result};
use crate::models::finalizers::{
    ApiResourceGroup, CandidateObject, CatalogEntry, ListScope, ResourceTypeDescriptor,
};
use crate::models::DeleteMode;
use crate::resources::ClusterOps;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Namespace;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResourceList;
use kube::{
    api::{Api, ApiResource, DeleteParams, DynamicObject, ListParams, Patch, PatchParams},
    core::GroupVersionKind,
    Client, ResourceExt,
};
use serde_json::json;

/// `ClusterOps` backed by a live API server.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn try_default() -> Result<Self> {
        let client = Client::try_default()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create Kubernetes client: {}", e)))?;
        Ok(Self::new(client))
    }

    fn dynamic_api(&self, entry: &CatalogEntry, scope: ListScope<'_>) -> Api<DynamicObject> {
        let gvk = GroupVersionKind::gvk(&entry.gv.group, &entry.gv.version, &entry.resource.kind);
        let ar = ApiResource::from_gvk_with_plural(&gvk, &entry.resource.name);
        match scope {
            ListScope::AllNamespaces => Api::all_with(self.client.clone(), &ar),
            ListScope::Namespace(ns) => Api::namespaced_with(self.client.clone(), ns, &ar),
        }
    }
}

fn into_group(list: APIResourceList) -> ApiResourceGroup {
    let resources = list
        .resources
        .into_iter()
        // subresources such as pods/log cannot be listed on their own
        .filter(|r| !r.name.contains('/'))
        .map(|r| ResourceTypeDescriptor {
            group_version: list.group_version.clone(),
            name: r.name,
            kind: r.kind,
            namespaced: r.namespaced,
            verbs: r.verbs.into_iter().collect(),
        })
        .collect();
    ApiResourceGroup {
        group_version: list.group_version,
        resources,
    }
}

#[async_trait]
impl ClusterOps for KubeCluster {
    async fn preferred_resources(&self) -> Result<Vec<ApiResourceGroup>> {
        let discovery_err = |e: kube::Error| AppError::Discovery(e.to_string());
        let mut groups = Vec::new();

        let core = self.client.list_core_api_versions().await.map_err(discovery_err)?;
        for version in &core.versions {
            let list = self
                .client
                .list_core_api_resources(version)
                .await
                .map_err(discovery_err)?;
            groups.push(into_group(list));
        }

        let api_groups = self.client.list_api_groups().await.map_err(discovery_err)?;
        for g in api_groups.groups {
            let Some(preferred) = g.preferred_version.as_ref().or_else(|| g.versions.first()) else {
                tracing::debug!(group = %g.name, "API group advertises no versions");
                continue;
            };
            let list = self
                .client
                .list_api_group_resources(&preferred.group_version)
                .await
                .map_err(discovery_err)?;
            groups.push(into_group(list));
        }

        Ok(groups)
    }

    async fn list_namespaces(&self) -> Result<Vec<String>> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let list = api.list(&ListParams::default()).await?;
        Ok(list.items.iter().map(|ns| ns.name_any()).collect())
    }

    async fn list_objects(
        &self,
        entry: &CatalogEntry,
        scope: ListScope<'_>,
    ) -> Result<Vec<CandidateObject>> {
        let api = self.dynamic_api(entry, scope);
        let list = api.list(&ListParams::default()).await?;
        Ok(list.items.iter().map(CandidateObject::from).collect())
    }

    async fn delete_object(
        &self,
        entry: &CatalogEntry,
        namespace: &str,
        name: &str,
        mode: DeleteMode,
    ) -> Result<()> {
        let api = self.dynamic_api(entry, ListScope::Namespace(namespace));
        let result = match mode {
            DeleteMode::Force => {
                let dp = DeleteParams {
                    grace_period_seconds: Some(0),
                    ..DeleteParams::background()
                };
                api.delete(name, &dp).await.map(|_| ())
            }
            DeleteMode::ClearFinalizers => {
                let patch = json!({ "metadata": { "finalizers": null } });
                api.patch(name, &PatchParams::default(), &Patch::Merge(&patch))
                    .await
                    .map(|_| ())
            }
        };
        match result {
            Ok(()) => {}
            // already gone, e.g. released by its controller since the list call
            Err(kube::Error::Api(err)) if err.code == 404 => {}
            Err(e) => return Err(AppError::Kube(e)),
        }
        Ok(())
    }
}
