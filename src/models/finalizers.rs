use chrono::{DateTime, Utc};
use kube::api::DynamicObject;
use kube::core::GroupVersion;
use kube::ResourceExt;
use std::collections::{BTreeMap, HashSet};

/// One resource type as announced by the discovery catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTypeDescriptor {
    pub group_version: String,
    /// Plural resource name, e.g. `configmaps`.
    pub name: String,
    pub kind: String,
    pub namespaced: bool,
    pub verbs: HashSet<String>,
}

/// A namespaced, listable resource type with its parsed group/version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub gv: GroupVersion,
    pub resource: ResourceTypeDescriptor,
}

impl CatalogEntry {
    pub fn name(&self) -> &str {
        &self.resource.name
    }
}

/// Resource types served under a single group/version.
#[derive(Debug, Clone)]
pub struct ApiResourceGroup {
    pub group_version: String,
    pub resources: Vec<ResourceTypeDescriptor>,
}

/// The subset of an object's metadata the scan looks at.
#[derive(Debug, Clone, Default)]
pub struct CandidateObject {
    pub name: String,
    pub namespace: String,
    pub labels: BTreeMap<String, String>,
    pub creation_timestamp: Option<DateTime<Utc>>,
    pub finalizers: Vec<String>,
    pub deletion_timestamp: Option<DateTime<Utc>>,
}

impl From<&DynamicObject> for CandidateObject {
    fn from(obj: &DynamicObject) -> Self {
        CandidateObject {
            name: obj.name_any(),
            namespace: obj.namespace().unwrap_or_default(),
            labels: obj.labels().clone(),
            creation_timestamp: obj.metadata.creation_timestamp.as_ref().map(|t| t.0),
            finalizers: obj.finalizers().to_vec(),
            deletion_timestamp: obj.metadata.deletion_timestamp.as_ref().map(|t| t.0),
        }
    }
}

/// Where a list call is aimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope<'a> {
    AllNamespaces,
    Namespace(&'a str),
}

/// Objects of one type in one namespace that are stuck in deletion.
#[derive(Debug, Clone)]
pub struct PendingGroup {
    pub entry: CatalogEntry,
    pub names: Vec<String>,
}

/// namespace -> resource type -> names
pub type ScanResponse = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// Accumulates pending-deletion objects for a single scan.
#[derive(Debug, Clone, Default)]
pub struct PendingDeletionIndex {
    namespaces: BTreeMap<String, BTreeMap<String, PendingGroup>>,
}

impl PendingDeletionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a namespace so it is reported even when nothing matched in it.
    pub fn touch_namespace(&mut self, namespace: &str) {
        self.namespaces.entry(namespace.to_string()).or_default();
    }

    /// Records `name` under (namespace, resource). A name already recorded for
    /// the same key is ignored.
    pub fn insert(&mut self, namespace: &str, entry: &CatalogEntry, name: &str) {
        let group = self
            .namespaces
            .entry(namespace.to_string())
            .or_default()
            .entry(entry.name().to_string())
            .or_insert_with(|| PendingGroup {
                entry: entry.clone(),
                names: Vec::new(),
            });
        if !group.names.iter().any(|n| n == name) {
            group.names.push(name.to_string());
        }
    }

    pub fn groups_mut(&mut self) -> impl Iterator<Item = (&String, &mut PendingGroup)> {
        self.namespaces
            .iter_mut()
            .flat_map(|(ns, groups)| groups.values_mut().map(move |group| (ns, group)))
    }

    /// Drops every namespace not accepted by `keep`.
    pub fn retain_namespaces<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.namespaces.retain(|ns, _| keep(ns));
    }

    /// Projects the index into the reported shape with names sorted.
    pub fn to_response(&self) -> ScanResponse {
        self.namespaces
            .iter()
            .map(|(ns, groups)| {
                let types = groups
                    .iter()
                    .map(|(resource, group)| {
                        let mut names = group.names.clone();
                        names.sort();
                        (resource.clone(), names)
                    })
                    .collect();
                (ns.clone(), types)
            })
            .collect()
    }
}
