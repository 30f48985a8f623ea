use crate::error::{AppError, Result};
use crate::models::finalizers::CandidateObject;
use crate::models::FilterOptions;
use crate::utils::validation;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

/// Objects carrying `kor/used=true` are known to be in use and never reported.
pub const USED_LABEL: &str = "kor/used";

/// A single equality-based label selector term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelRequirement {
    Equals { key: String, value: String },
    NotEquals { key: String, value: String },
    Exists { key: String },
}

impl FromStr for LabelRequirement {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let requirement = if let Some((key, value)) = raw.split_once("!=") {
            LabelRequirement::NotEquals {
                key: key.trim().to_string(),
                value: value.trim().to_string(),
            }
        } else if let Some((key, value)) = raw.split_once("==").or_else(|| raw.split_once('=')) {
            LabelRequirement::Equals {
                key: key.trim().to_string(),
                value: value.trim().to_string(),
            }
        } else {
            LabelRequirement::Exists { key: raw.to_string() }
        };
        validation::validate_label_key(requirement.key())?;
        Ok(requirement)
    }
}

impl LabelRequirement {
    pub fn key(&self) -> &str {
        match self {
            LabelRequirement::Equals { key, .. }
            | LabelRequirement::NotEquals { key, .. }
            | LabelRequirement::Exists { key } => key,
        }
    }

    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        match self {
            LabelRequirement::Equals { key, value } => labels.get(key) == Some(value),
            LabelRequirement::NotEquals { key, value } => labels.get(key) != Some(value),
            LabelRequirement::Exists { key } => labels.contains_key(key),
        }
    }
}

/// Decides which listed objects are eligible for classification.
#[derive(Debug, Clone, Default)]
pub struct ObjectFilter {
    exclude: Vec<LabelRequirement>,
    older_than: Option<Duration>,
    newer_than: Option<Duration>,
}

impl ObjectFilter {
    /// Parses the caller's options up front so bad input fails before any list call.
    pub fn new(opts: &FilterOptions) -> Result<Self> {
        let exclude = opts
            .exclude_labels
            .iter()
            .map(|s| s.parse())
            .collect::<Result<Vec<_>>>()?;

        if let (Some(older), Some(newer)) = (opts.older_than, opts.newer_than) {
            if older > newer {
                return Err(AppError::Validation(format!(
                    "older-than ({}) cannot exceed newer-than ({})",
                    humantime::format_duration(older),
                    humantime::format_duration(newer)
                )));
            }
        }

        Ok(Self {
            exclude,
            older_than: opts.older_than,
            newer_than: opts.newer_than,
        })
    }

    /// Runs the pipeline in order: in-use label, exclusion labels, age window.
    pub fn admits(&self, obj: &CandidateObject, now: DateTime<Utc>) -> bool {
        !is_marked_used(&obj.labels)
            && !self.has_excluded_label(&obj.labels)
            && self.has_included_age(obj.creation_timestamp, now)
    }

    pub fn has_excluded_label(&self, labels: &BTreeMap<String, String>) -> bool {
        self.exclude.iter().any(|req| req.matches(labels))
    }

    /// Objects without a creation timestamp only pass when no window is set.
    pub fn has_included_age(&self, created: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        if self.older_than.is_none() && self.newer_than.is_none() {
            return true;
        }
        let Some(created) = created else {
            return false;
        };
        // clock skew can put creation in the future
        let age = (now - created).to_std().unwrap_or_default();

        if self.older_than.is_some_and(|min| age < min) {
            return false;
        }
        if self.newer_than.is_some_and(|max| age > max) {
            return false;
        }
        true
    }
}

pub fn is_marked_used(labels: &BTreeMap<String, String>) -> bool {
    labels.get(USED_LABEL).map(String::as_str) == Some("true")
}

/// An object is stuck in deletion when it still has finalizers and its
/// deletion has already been requested.
pub fn is_pending_deletion(
    finalizers: &[String],
    deletion_timestamp: Option<&DateTime<Utc>>,
) -> bool {
    !finalizers.is_empty() && deletion_timestamp.is_some()
}
