use crate::error::Result;
use crate::models::finalizers::{ApiResourceGroup, CatalogEntry};
use crate::resources::ClusterOps;
use kube::core::gvk::ParseGroupVersionError;
use kube::core::GroupVersion;

/// Parses a discovery group/version such as `apps/v1` or the core `v1`.
pub fn parse_group_version(raw: &str) -> Result<GroupVersion> {
    let gv: GroupVersion = raw.parse()?;
    if gv.version.is_empty() || gv.version.contains('/') {
        return Err(ParseGroupVersionError(raw.to_string()).into());
    }
    Ok(gv)
}

/// Keeps the resource types that are namespaced and support `list`.
///
/// A group whose group/version does not parse is skipped with a warning; the
/// other groups are still returned.
pub fn select_scannable(groups: &[ApiResourceGroup]) -> Vec<CatalogEntry> {
    let mut entries = Vec::new();
    for group in groups {
        let gv = match parse_group_version(&group.group_version) {
            Ok(gv) => gv,
            Err(e) => {
                tracing::warn!(
                    group_version = %group.group_version,
                    error = %e,
                    "Skipping API group with malformed group/version"
                );
                continue;
            }
        };
        entries.extend(
            group
                .resources
                .iter()
                .filter(|r| r.namespaced && r.verbs.contains("list"))
                .map(|r| CatalogEntry {
                    gv: gv.clone(),
                    resource: r.clone(),
                }),
        );
    }
    entries
}

/// Fetches the cluster's preferred resources.
///
/// A failure here is fatal for the scan: without the catalog there is
/// nothing meaningful to list.
pub async fn fetch_catalog(cluster: &dyn ClusterOps) -> Result<Vec<ApiResourceGroup>> {
    let groups = cluster.preferred_resources().await?;
    tracing::debug!(group_versions = groups.len(), "Fetched discovery catalog");
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::resources::fake::{descriptor, FakeCluster};

    #[test]
    fn test_parse_group_version() {
        let gv = parse_group_version("apps/v1").unwrap();
        assert_eq!(gv.group, "apps");
        assert_eq!(gv.version, "v1");

        let core = parse_group_version("v1").unwrap();
        assert_eq!(core.group, "");
        assert_eq!(core.version, "v1");

        assert!(parse_group_version("").is_err());
        assert!(parse_group_version("a/b/c").is_err());
        assert!(parse_group_version("apps/").is_err());
    }

    #[test]
    fn test_select_scannable_requires_namespaced_and_list() {
        let groups = vec![ApiResourceGroup {
            group_version: "v1".into(),
            resources: vec![
                descriptor("v1", "configmaps", "ConfigMap", true, &["list", "delete"]),
                descriptor("v1", "nodes", "Node", false, &["list"]),
                descriptor("v1", "bindings", "Binding", true, &["create"]),
            ],
        }];

        let entries = select_scannable(&groups);
        let names: Vec<_> = entries.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["configmaps"]);
        assert_eq!(entries[0].gv, GroupVersion::gv("", "v1"));
    }

    #[test]
    fn test_select_scannable_skips_bad_group_version() {
        let groups = vec![
            ApiResourceGroup {
                group_version: "a/b/c".into(),
                resources: vec![descriptor("a/b/c", "widgets", "Widget", true, &["list"])],
            },
            ApiResourceGroup {
                group_version: "apps/v1".into(),
                resources: vec![descriptor(
                    "apps/v1",
                    "deployments",
                    "Deployment",
                    true,
                    &["list"],
                )],
            },
        ];

        let entries = select_scannable(&groups);
        let names: Vec<_> = entries.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["deployments"]);
        assert_eq!(entries[0].gv, GroupVersion::gv("apps", "v1"));
    }

    #[tokio::test]
    async fn test_fetch_catalog_surfaces_discovery_failure() {
        let cluster = FakeCluster {
            fail_discovery: true,
            ..FakeCluster::new(&["default"])
        };

        assert!(matches!(fetch_catalog(&cluster).await, Err(AppError::Discovery(_))));
    }
}
