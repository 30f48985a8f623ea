pub mod dynamic;
#[cfg(test)]
pub mod fake;

use crate::error::Result;
use crate::models::finalizers::{ApiResourceGroup, CandidateObject, CatalogEntry, ListScope};
use crate::models::DeleteMode;

/// The cluster operations a scan needs.
#[async_trait::async_trait]
pub trait ClusterOps: Send + Sync {
    /// Preferred resource types, one entry per group/version.
    async fn preferred_resources(&self) -> Result<Vec<ApiResourceGroup>>;

    async fn list_namespaces(&self) -> Result<Vec<String>>;

    async fn list_objects(
        &self,
        entry: &CatalogEntry,
        scope: ListScope<'_>,
    ) -> Result<Vec<CandidateObject>>;

    async fn delete_object(
        &self,
        entry: &CatalogEntry,
        namespace: &str,
        name: &str,
        mode: DeleteMode,
    ) -> Result<()>;
}
