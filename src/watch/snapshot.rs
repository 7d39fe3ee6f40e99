//! Projection of `batch/v1` Job resources onto `JobSnapshot`

use k8s_openapi::api::batch::v1::Job;
use kube::ResourceExt;

use crate::job::{JobKey, JobSnapshot};

/// `None` when the object has no name
pub fn job_key(job: &Job) -> Option<JobKey> {
    let name = job.metadata.name.as_deref().filter(|n| !n.is_empty())?;
    Some(JobKey::new(job.namespace().unwrap_or_default(), name))
}

/// A `Failed` condition with status `"True"`
pub fn is_condition_failed(job: &Job) -> bool {
    job.status
        .as_ref()
        .and_then(|s| s.conditions.as_ref())
        .is_some_and(|conditions| {
            conditions
                .iter()
                .any(|c| c.type_ == "Failed" && c.status == "True")
        })
}

/// Keep only the fields completion detection needs
pub fn snapshot(job: &Job) -> Option<JobSnapshot> {
    let key = job_key(job)?;
    let status = job.status.as_ref();

    // Negative counts read as "not succeeded"
    let succeeded = status
        .and_then(|s| s.succeeded)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0);
    let completion_time = status.and_then(|s| s.completion_time.as_ref()).map(|t| t.0);

    Some(JobSnapshot {
        key,
        succeeded,
        failed: is_condition_failed(job),
        completion_time,
    })
}
