use crate::models::finalizers::{CatalogEntry, ListScope, PendingDeletionIndex};
use crate::resources::ClusterOps;
use crate::scanner::filter::{is_pending_deletion, ObjectFilter};
use chrono::Utc;

/// How list calls are issued for a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanPlan {
    /// One cluster-wide list per type; hits are bucketed by the object's own
    /// namespace and then restricted to `namespaces`.
    Global { namespaces: Vec<String> },
    /// One list per type per namespace. Every namespace is reported, even
    /// when nothing matched.
    Scoped { namespaces: Vec<String> },
}

/// Lists every catalog entry according to `plan` and collects the objects
/// stuck in deletion.
pub async fn collect_pending(
    cluster: &dyn ClusterOps,
    catalog: &[CatalogEntry],
    plan: &ScanPlan,
    filter: &ObjectFilter,
) -> PendingDeletionIndex {
    let mut index = PendingDeletionIndex::new();
    match plan {
        ScanPlan::Global { namespaces } => {
            scan_scope(cluster, catalog, ListScope::AllNamespaces, filter, &mut index).await;
            index.retain_namespaces(|ns| namespaces.iter().any(|n| n == ns));
        }
        ScanPlan::Scoped { namespaces } => {
            for ns in namespaces {
                index.touch_namespace(ns);
                scan_scope(cluster, catalog, ListScope::Namespace(ns), filter, &mut index).await;
            }
        }
    }
    index
}

async fn scan_scope(
    cluster: &dyn ClusterOps,
    catalog: &[CatalogEntry],
    scope: ListScope<'_>,
    filter: &ObjectFilter,
    index: &mut PendingDeletionIndex,
) {
    let now = Utc::now();
    for entry in catalog {
        let objects = match cluster.list_objects(entry, scope).await {
            Ok(objects) => objects,
            Err(e) => {
                tracing::warn!(
                    group_version = %entry.resource.group_version,
                    resource = %entry.name(),
                    error = %e,
                    "Error listing resources, skipping"
                );
                continue;
            }
        };

        for obj in objects
            .iter()
            .filter(|obj| filter.admits(obj, now))
            .filter(|obj| is_pending_deletion(&obj.finalizers, obj.deletion_timestamp.as_ref()))
        {
            let namespace = match scope {
                ListScope::AllNamespaces => obj.namespace.as_str(),
                ListScope::Namespace(ns) => ns,
            };
            tracing::debug!(
                namespace,
                resource = %entry.name(),
                name = %obj.name,
                "Found object pending deletion"
            );
            index.insert(namespace, entry, &obj.name);
        }
    }
}
