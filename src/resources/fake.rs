//! In-memory cluster used by tests.

use crate::error::{AppError, Result};
use crate::models::finalizers::{
    ApiResourceGroup, CandidateObject, CatalogEntry, ListScope, ResourceTypeDescriptor,
};
use crate::models::DeleteMode;
use crate::resources::ClusterOps;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

pub fn descriptor(
    group_version: &str,
    name: &str,
    kind: &str,
    namespaced: bool,
    verbs: &[&str],
) -> ResourceTypeDescriptor {
    ResourceTypeDescriptor {
        group_version: group_version.into(),
        name: name.into(),
        kind: kind.into(),
        namespaced,
        verbs: verbs.iter().map(|v| v.to_string()).collect(),
    }
}

/// An object stuck in deletion: one finalizer, deletion requested, an hour old.
pub fn stuck(namespace: &str, name: &str) -> CandidateObject {
    let now = Utc::now();
    CandidateObject {
        name: name.into(),
        namespace: namespace.into(),
        labels: BTreeMap::new(),
        creation_timestamp: Some(now - Duration::hours(1)),
        finalizers: vec!["fin.example/x".into()],
        deletion_timestamp: Some(now),
    }
}

/// An object with no deletion requested.
pub fn healthy(namespace: &str, name: &str) -> CandidateObject {
    CandidateObject {
        deletion_timestamp: None,
        ..stuck(namespace, name)
    }
}

#[derive(Default)]
pub struct FakeCluster {
    pub groups: Vec<ApiResourceGroup>,
    pub namespaces: Vec<String>,
    /// resource name -> objects of that type
    pub objects: BTreeMap<String, Vec<CandidateObject>>,
    pub fail_discovery: bool,
    pub fail_list: HashSet<String>,
    /// object names whose deletion is rejected
    pub fail_delete: HashSet<String>,
    pub list_calls: Mutex<Vec<(String, Option<String>)>>,
    pub deleted: Mutex<Vec<(String, String, String, DeleteMode)>>,
}

impl FakeCluster {
    pub fn new(namespaces: &[&str]) -> Self {
        Self {
            groups: vec![
                ApiResourceGroup {
                    group_version: "v1".into(),
                    resources: vec![
                        descriptor("v1", "configmaps", "ConfigMap", true, &["list", "delete"]),
                        descriptor("v1", "nodes", "Node", false, &["list", "delete"]),
                    ],
                },
                ApiResourceGroup {
                    group_version: "apps/v1".into(),
                    resources: vec![descriptor(
                        "apps/v1",
                        "deployments",
                        "Deployment",
                        true,
                        &["list", "delete"],
                    )],
                },
            ],
            namespaces: namespaces.iter().map(|ns| ns.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_object(mut self, resource: &str, obj: CandidateObject) -> Self {
        self.objects.entry(resource.to_string()).or_default().push(obj);
        self
    }

    pub fn deleted_names(&self) -> Vec<String> {
        self.deleted
            .lock()
            .unwrap()
            .iter()
            .map(|(_, _, name, _)| name.clone())
            .collect()
    }
}

#[async_trait]
impl ClusterOps for FakeCluster {
    async fn preferred_resources(&self) -> Result<Vec<ApiResourceGroup>> {
        if self.fail_discovery {
            return Err(AppError::Discovery("connection refused".into()));
        }
        Ok(self.groups.clone())
    }

    async fn list_namespaces(&self) -> Result<Vec<String>> {
        Ok(self.namespaces.clone())
    }

    async fn list_objects(
        &self,
        entry: &CatalogEntry,
        scope: ListScope<'_>,
    ) -> Result<Vec<CandidateObject>> {
        let scope_ns = match scope {
            ListScope::AllNamespaces => None,
            ListScope::Namespace(ns) => Some(ns.to_string()),
        };
        self.list_calls
            .lock()
            .unwrap()
            .push((entry.name().to_string(), scope_ns.clone()));

        if self.fail_list.contains(entry.name()) {
            return Err(AppError::Internal(format!("{} is forbidden", entry.name())));
        }
        let deleted = self.deleted_names();
        Ok(self
            .objects
            .get(entry.name())
            .into_iter()
            .flatten()
            .filter(|obj| scope_ns.as_deref().is_none_or(|ns| obj.namespace == ns))
            .filter(|obj| !deleted.contains(&obj.name))
            .cloned()
            .collect())
    }

    async fn delete_object(
        &self,
        entry: &CatalogEntry,
        namespace: &str,
        name: &str,
        mode: DeleteMode,
    ) -> Result<()> {
        if self.fail_delete.contains(name) {
            return Err(AppError::Internal(format!("cannot delete {}", name)));
        }
        self.deleted.lock().unwrap().push((
            entry.name().to_string(),
            namespace.to_string(),
            name.to_string(),
            mode,
        ));
        Ok(())
    }
}
