use crate::error::Result;
use crate::models::IncludeExcludeLists;
use crate::resources::ClusterOps;
use crate::utils::validation;

/// Validates every namespace named in the include/exclude lists.
pub fn validate_lists(lists: &IncludeExcludeLists) -> Result<()> {
    lists
        .include_list
        .iter()
        .chain(&lists.exclude_list)
        .try_for_each(|ns| validation::validate_namespace(ns))
}

/// Narrows the cluster's namespaces to the ones the caller asked for.
///
/// A non-empty include list wins over the exclude list. Included names that do
/// not exist are skipped with a warning.
pub fn select_namespaces(all: &[String], lists: &IncludeExcludeLists) -> Vec<String> {
    let mut selected: Vec<String> = if !lists.include_list.is_empty() {
        lists
            .include_list
            .iter()
            .filter(|ns| {
                let exists = all.contains(ns);
                if !exists {
                    tracing::warn!(namespace = %ns, "Namespace not found, skipping");
                }
                exists
            })
            .cloned()
            .collect()
    } else {
        all.iter()
            .filter(|ns| !lists.exclude_list.contains(ns))
            .cloned()
            .collect()
    };
    selected.sort();
    selected.dedup();
    selected
}

pub async fn resolve_namespaces(
    cluster: &dyn ClusterOps,
    lists: &IncludeExcludeLists,
) -> Result<Vec<String>> {
    let all = cluster.list_namespaces().await?;
    Ok(select_namespaces(&all, lists))
}
