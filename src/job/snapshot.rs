//! Observed state of a single Job resource

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a Job: `(namespace, name)`
///
/// Rendered as `namespace/name`, the same form the cluster uses for cache keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobKey {
    pub namespace: String,
    pub name: String,
}

impl JobKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Immutable snapshot of a Job at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSnapshot {
    /// Dedup key
    pub key: JobKey,
    /// Number of pods that completed successfully so far
    pub succeeded: u32,
    /// The Job carries a `Failed` condition with status `"True"`
    pub failed: bool,
    /// Set by the Job controller once the Job succeeded
    pub completion_time: Option<DateTime<Utc>>,
}

impl JobSnapshot {
    /// Snapshot of a Job that has not finished yet
    pub fn new(key: JobKey) -> Self {
        Self {
            key,
            succeeded: 0,
            failed: false,
            completion_time: None,
        }
    }

    pub fn with_succeeded(mut self, succeeded: u32) -> Self {
        self.succeeded = succeeded;
        self
    }

    pub fn with_failed(mut self, failed: bool) -> Self {
        self.failed = failed;
        self
    }

    pub fn with_completion_time(mut self, at: DateTime<Utc>) -> Self {
        self.completion_time = Some(at);
        self
    }
}
