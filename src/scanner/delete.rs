use crate::models::finalizers::PendingDeletionIndex;
use crate::models::DeleteMode;
use crate::resources::ClusterOps;
use crate::utils::prompt::Confirm;

/// A single object the driver failed to delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDeletion {
    pub namespace: String,
    pub resource: String,
    pub name: String,
}

impl std::fmt::Display for FailedDeletion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.namespace, self.resource, self.name)
    }
}

#[derive(Debug, Default)]
pub struct DeletionSummary {
    pub deleted: usize,
    pub declined_groups: usize,
    pub failed: Vec<FailedDeletion>,
}

/// Deletes every pending group in an index.
///
/// Afterwards each group holds only the names whose delete call failed, or all
/// of its names when the group was declined. A successful call does not mean
/// the object is gone: under `DeleteMode::Force` an object whose finalizers
/// are still set stays in the cluster until they are cleared.
pub struct DeletionDriver<'a> {
    cluster: &'a dyn ClusterOps,
    confirm: &'a dyn Confirm,
    no_interactive: bool,
    mode: DeleteMode,
}

impl<'a> DeletionDriver<'a> {
    pub fn new(
        cluster: &'a dyn ClusterOps,
        confirm: &'a dyn Confirm,
        no_interactive: bool,
        mode: DeleteMode,
    ) -> Self {
        Self {
            cluster,
            confirm,
            no_interactive,
            mode,
        }
    }

    pub async fn run(&self, index: &mut PendingDeletionIndex) -> DeletionSummary {
        let mut summary = DeletionSummary::default();

        for (namespace, group) in index.groups_mut() {
            if group.names.is_empty() {
                continue;
            }
            let resource = group.entry.name().to_string();

            if !self.no_interactive && !self.confirm.confirm(namespace, &resource, &group.names) {
                tracing::info!(
                    namespace = %namespace,
                    resource = %resource,
                    "Deletion declined, keeping objects in report"
                );
                summary.declined_groups += 1;
                continue;
            }

            let mut residual = Vec::new();
            for name in group.names.drain(..) {
                let result = self
                    .cluster
                    .delete_object(&group.entry, namespace, &name, self.mode)
                    .await;
                match result {
                    Ok(()) => {
                        tracing::info!(
                            namespace = %namespace,
                            resource = %resource,
                            name = %name,
                            mode = ?self.mode,
                            "Deleted object pending deletion"
                        );
                        summary.deleted += 1;
                    }
                    Err(e) => {
                        tracing::error!(
                            namespace = %namespace,
                            resource = %resource,
                            name = %name,
                            error = %e,
                            "Failed to delete object waiting for finalizers"
                        );
                        summary.failed.push(FailedDeletion {
                            namespace: namespace.clone(),
                            resource: resource.clone(),
                            name: name.clone(),
                        });
                        residual.push(name);
                    }
                }
            }
            group.names = residual;
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::fake::{stuck, FakeCluster};
    use crate::scanner::catalog::select_scannable;
    use crate::scanner::filter::ObjectFilter;
    use crate::scanner::scan::{collect_pending, ScanPlan};
    use crate::utils::prompt::AutoConfirm;
    use std::sync::Mutex;

    struct Decline {
        asked: Mutex<Vec<String>>,
    }

    impl Confirm for Decline {
        fn confirm(&self, namespace: &str, resource: &str, _names: &[String]) -> bool {
            self.asked.lock().unwrap().push(format!("{}/{}", namespace, resource));
            false
        }
    }

    /// Approves every group except those of one resource type.
    struct DeclineResource(&'static str);

    impl Confirm for DeclineResource {
        fn confirm(&self, _namespace: &str, resource: &str, _names: &[String]) -> bool {
            resource != self.0
        }
    }

    async fn pending(cluster: &FakeCluster) -> PendingDeletionIndex {
        let catalog = select_scannable(&cluster.groups);
        let plan = ScanPlan::Global {
            namespaces: cluster.namespaces.clone(),
        };
        collect_pending(cluster, &catalog, &plan, &ObjectFilter::default()).await
    }

    #[tokio::test]
    async fn test_successful_delete_empties_residual() {
        let cluster =
            FakeCluster::new(&["default"]).with_object("configmaps", stuck("default", "cm-a"));
        let mut index = pending(&cluster).await;

        let summary = DeletionDriver::new(&cluster, &AutoConfirm, true, DeleteMode::Force)
            .run(&mut index)
            .await;

        assert_eq!(summary.deleted, 1);
        assert!(index.to_response()["default"]["configmaps"].is_empty());
        assert_eq!(cluster.deleted_names(), vec!["cm-a"]);
    }

    #[tokio::test]
    async fn test_failed_delete_stays_in_report() {
        let mut cluster = FakeCluster::new(&["default"])
            .with_object("configmaps", stuck("default", "cm-a"))
            .with_object("configmaps", stuck("default", "cm-b"));
        cluster.fail_delete.insert("cm-a".into());
        let mut index = pending(&cluster).await;

        let summary = DeletionDriver::new(&cluster, &AutoConfirm, true, DeleteMode::Force)
            .run(&mut index)
            .await;

        assert_eq!(summary.deleted, 1);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].to_string(), "default/configmaps/cm-a");
        assert_eq!(index.to_response()["default"]["configmaps"], vec!["cm-a"]);
    }

    #[tokio::test]
    async fn test_declined_group_is_kept_untouched() {
        let cluster = FakeCluster::new(&["default"])
            .with_object("configmaps", stuck("default", "cm-a"))
            .with_object("deployments", stuck("default", "web"));
        let mut index = pending(&cluster).await;
        let decline = Decline { asked: Mutex::new(vec![]) };

        let summary = DeletionDriver::new(&cluster, &decline, false, DeleteMode::Force)
            .run(&mut index)
            .await;

        assert_eq!(summary.declined_groups, 2);
        assert!(cluster.deleted_names().is_empty());
        assert_eq!(
            *decline.asked.lock().unwrap(),
            vec!["default/configmaps", "default/deployments"]
        );
        let response = index.to_response();
        assert_eq!(response["default"]["configmaps"], vec!["cm-a"]);
        assert_eq!(response["default"]["deployments"], vec!["web"]);
    }

    #[tokio::test]
    async fn test_no_interactive_skips_prompt() {
        let cluster =
            FakeCluster::new(&["default"]).with_object("configmaps", stuck("default", "cm-a"));
        let mut index = pending(&cluster).await;
        let decline = Decline { asked: Mutex::new(vec![]) };

        DeletionDriver::new(&cluster, &decline, true, DeleteMode::ClearFinalizers)
            .run(&mut index)
            .await;

        assert!(decline.asked.lock().unwrap().is_empty());
        let deleted = cluster.deleted.lock().unwrap();
        assert_eq!(deleted[0].3, DeleteMode::ClearFinalizers);
    }

    #[tokio::test]
    async fn test_residual_holds_failed_and_declined_names() {
        let mut cluster = FakeCluster::new(&["default"])
            .with_object("configmaps", stuck("default", "cm-ok"))
            .with_object("configmaps", stuck("default", "cm-stuck"))
            .with_object("deployments", stuck("default", "web"));
        cluster.fail_delete.insert("cm-stuck".into());
        let mut index = pending(&cluster).await;

        let summary =
            DeletionDriver::new(&cluster, &DeclineResource("deployments"), false, DeleteMode::Force)
                .run(&mut index)
                .await;

        assert_eq!(summary.deleted, 1);
        assert_eq!(summary.declined_groups, 1);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(cluster.deleted_names(), vec!["cm-ok"]);
        let response = index.to_response();
        assert_eq!(response["default"]["configmaps"], vec!["cm-stuck"]);
        assert_eq!(response["default"]["deployments"], vec!["web"]);
    }
}
