use crate::error::Result;
use crate::handlers::AppState;
use crate::models::{
    split_list, DeleteMode, FilterOptions, IncludeExcludeLists, ScanOptions, ScanQuery,
};
use crate::scanner::{self, report::Report};
use crate::utils::prompt::AutoConfirm;
use crate::utils::validation;
use axum::{
    extract::{Query, State},
    response::Json as ResponseJson,
};
use serde_json::{json, Value};

fn parse_query(params: &ScanQuery) -> Result<(IncludeExcludeLists, FilterOptions)> {
    let lists = IncludeExcludeLists {
        include_list: split_list(params.include.as_deref()),
        exclude_list: split_list(params.exclude.as_deref()),
    };
    let filter_opts = FilterOptions {
        exclude_labels: split_list(params.exclude_labels.as_deref()),
        older_than: params.older_than.as_deref().map(validation::parse_age).transpose()?,
        newer_than: params.newer_than.as_deref().map(validation::parse_age).transpose()?,
    };
    Ok((lists, filter_opts))
}

fn into_body(report: Report) -> Value {
    json!({
        "count": report.pending_count(),
        "pending": report.response,
        "report": report.rendered,
    })
}

/// GET /finalizers: report objects stuck in deletion.
pub async fn scan_finalizers(
    State(state): State<AppState>,
    Query(params): Query<ScanQuery>,
) -> Result<ResponseJson<Value>> {
    let (lists, filter_opts) = parse_query(&params)?;
    let opts = ScanOptions {
        output: params.output.unwrap_or_default(),
        ..Default::default()
    };

    let report = scanner::get_pending_finalizers(
        state.cluster.as_ref(),
        &AutoConfirm,
        &lists,
        &filter_opts,
        &opts,
    )
    .await?;

    tracing::info!(pending = report.pending_count(), "Finalizer scan completed");

    Ok(ResponseJson(into_body(report)))
}

/// DELETE /finalizers: delete objects stuck in deletion and report what is left.
///
/// There is nobody to prompt over HTTP, so this always runs non-interactively.
pub async fn delete_finalizers(
    State(state): State<AppState>,
    Query(params): Query<ScanQuery>,
) -> Result<ResponseJson<Value>> {
    let (lists, filter_opts) = parse_query(&params)?;
    let opts = ScanOptions {
        delete: true,
        no_interactive: true,
        delete_mode: if params.clear_finalizers {
            DeleteMode::ClearFinalizers
        } else {
            DeleteMode::Force
        },
        output: params.output.unwrap_or_default(),
    };

    let report = scanner::get_pending_finalizers(
        state.cluster.as_ref(),
        &AutoConfirm,
        &lists,
        &filter_opts,
        &opts,
    )
    .await?;

    tracing::info!(remaining = report.pending_count(), "Finalizer cleanup completed");

    Ok(ResponseJson(into_body(report)))
}
