//! Finds namespaced objects stuck in deletion behind their finalizers.
//!
//! A scan fetches the discovery catalog once, lists every namespaced and
//! listable type (cluster-wide, or once per namespace when the caller filtered
//! namespaces), keeps the objects that still carry finalizers after their
//! deletion was requested, optionally deletes them, and renders a report.

pub mod catalog;
pub mod delete;
pub mod filter;
pub mod namespaces;
pub mod report;
pub mod scan;

use crate::error::Result;
use crate::models::{FilterOptions, IncludeExcludeLists, ScanOptions};
use crate::resources::ClusterOps;
use crate::utils::prompt::Confirm;
use delete::DeletionDriver;
use filter::ObjectFilter;
use report::Report;
use scan::ScanPlan;

pub async fn get_pending_finalizers(
    cluster: &dyn ClusterOps,
    confirm: &dyn Confirm,
    lists: &IncludeExcludeLists,
    filter_opts: &FilterOptions,
    opts: &ScanOptions,
) -> Result<Report> {
    namespaces::validate_lists(lists)?;
    let filter = ObjectFilter::new(filter_opts)?;

    let target = namespaces::resolve_namespaces(cluster, lists).await?;
    let groups = catalog::fetch_catalog(cluster).await?;

    let plan = if lists.is_global() {
        ScanPlan::Global { namespaces: target }
    } else {
        ScanPlan::Scoped { namespaces: target }
    };

    let entries = catalog::select_scannable(&groups);
    tracing::info!(
        resource_types = entries.len(),
        mode = ?plan,
        "Scanning for objects pending finalizers"
    );
    let mut index = scan::collect_pending(cluster, &entries, &plan, &filter).await;

    if opts.delete {
        let driver =
            DeletionDriver::new(cluster, confirm, opts.no_interactive, opts.delete_mode);
        let summary = driver.run(&mut index).await;
        tracing::info!(
            deleted = summary.deleted,
            failed = summary.failed.len(),
            declined_groups = summary.declined_groups,
            "Deletion finished"
        );
        if !summary.failed.is_empty() {
            let failed: Vec<String> = summary.failed.iter().map(ToString::to_string).collect();
            tracing::warn!(
                objects = %failed.join(", "),
                "Some objects could not be deleted and remain in the report"
            );
        }
    }

    report::build_report(index.to_response(), opts.output)
}
