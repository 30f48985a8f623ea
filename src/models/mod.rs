pub mod finalizers;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Query string accepted by the `/finalizers` routes.
///
/// List values are comma separated, mirroring the CLI flags.
#[derive(Debug, Default, Deserialize)]
pub struct ScanQuery {
    pub include: Option<String>,
    pub exclude: Option<String>,
    pub exclude_labels: Option<String>,
    pub older_than: Option<String>,
    pub newer_than: Option<String>,
    pub output: Option<OutputFormat>,
    #[serde(default)]
    pub clear_finalizers: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Per-object filters applied before the finalizer check.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub exclude_labels: Vec<String>,
    /// Objects younger than this are skipped.
    pub older_than: Option<Duration>,
    /// Objects older than this are skipped.
    pub newer_than: Option<Duration>,
}

/// Namespace include/exclude lists as supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct IncludeExcludeLists {
    pub include_list: Vec<String>,
    pub exclude_list: Vec<String>,
}

impl IncludeExcludeLists {
    /// No explicit namespace filter means a single cluster-wide pass is enough.
    pub fn is_global(&self) -> bool {
        self.include_list.is_empty() && self.exclude_list.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteMode {
    /// Delete with a zero grace period.
    #[default]
    Force,
    /// Null out `metadata.finalizers` so the pending deletion can complete.
    ClearFinalizers,
}

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub delete: bool,
    pub no_interactive: bool,
    pub delete_mode: DeleteMode,
    pub output: OutputFormat,
}

/// Splits a comma separated list, dropping empty entries.
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}
