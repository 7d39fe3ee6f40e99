//! Job informer - watch stream plus periodic resync of Job resources
//!
//! Keeps the last snapshot of every Job and hands `(previous, current)` pairs
//! to a `JobEventHandler`:
//! - updates of Jobs already known, from the watch stream or a relist
//! - every cached Job on each resync tick, with `previous == current`
//!
//! Jobs first seen in a listing or as a new object only populate the cache,
//! so Jobs that were already finished at startup are not reported.
//!
//! Pairs are delivered in order from a single task.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::{stream::BoxStream, StreamExt};
use k8s_openapi::api::batch::v1::Job;
use kube::runtime::{watcher, WatchStreamExt};
use kube::{Api, Client};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::snapshot::snapshot;
use crate::job::{JobKey, JobSnapshot};

/// Receives snapshot pairs from the informer
#[async_trait]
pub trait JobEventHandler: Send + Sync {
    async fn on_update(&self, previous: &JobSnapshot, current: &JobSnapshot);

    /// Initial listing finished; `jobs` is the number of cached Jobs
    async fn on_synced(&self, _jobs: usize) {}
}

pub type SnapshotPair = (JobSnapshot, JobSnapshot);

/// Last known snapshot per Job
#[derive(Debug, Default)]
pub struct JobCache {
    jobs: HashMap<JobKey, JobSnapshot>,
    /// Listing in progress, swapped in on `InitDone`
    staged: Option<HashMap<JobKey, JobSnapshot>>,
    synced: bool,
}

impl JobCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// A full listing has been applied at least once
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn get(&self, key: &JobKey) -> Option<&JobSnapshot> {
        self.jobs.get(key)
    }

    /// Apply one watcher event and return the pairs it produces.
    ///
    /// A completed listing yields pairs for Jobs that were already cached;
    /// new Jobs are inserted silently and Jobs missing from it are dropped.
    pub fn apply(&mut self, event: watcher::Event<Job>) -> Vec<SnapshotPair> {
        match event {
            watcher::Event::Init => {
                self.staged = Some(HashMap::new());
                Vec::new()
            }
            watcher::Event::InitApply(job) => {
                if let Some(current) = snapshot_or_skip(&job) {
                    self.staged
                        .get_or_insert_with(HashMap::new)
                        .insert(current.key.clone(), current);
                }
                Vec::new()
            }
            watcher::Event::InitDone => {
                let fresh = self.staged.take().unwrap_or_default();
                let pairs = fresh
                    .values()
                    .filter_map(|current| {
                        self.jobs
                            .get(&current.key)
                            .map(|previous| (previous.clone(), current.clone()))
                    })
                    .collect();
                self.jobs = fresh;
                self.synced = true;
                pairs
            }
            watcher::Event::Apply(job) => {
                let Some(current) = snapshot_or_skip(&job) else {
                    return Vec::new();
                };
                self.jobs
                    .insert(current.key.clone(), current.clone())
                    .map(|previous| vec![(previous, current)])
                    .unwrap_or_default()
            }
            watcher::Event::Delete(job) => {
                if let Some(current) = snapshot_or_skip(&job) {
                    self.jobs.remove(&current.key);
                }
                Vec::new()
            }
        }
    }

    /// Redeliver every cached Job as an unchanged pair
    pub fn resync(&self) -> Vec<SnapshotPair> {
        self.jobs
            .values()
            .map(|s| (s.clone(), s.clone()))
            .collect()
    }
}

fn snapshot_or_skip(job: &Job) -> Option<JobSnapshot> {
    let snapshot = snapshot(job);
    if snapshot.is_none() {
        debug!("Skipping Job without a name");
    }
    snapshot
}

/// Resync ticker, or `None` when the period is zero or too large to schedule
pub fn resync_interval(period: Duration) -> Option<Interval> {
    if period.is_zero() {
        return None;
    }
    let Some(start) = Instant::now().checked_add(period) else {
        warn!(resync_period = ?period, "Resync period out of range, resync disabled");
        return None;
    };
    let mut interval = tokio::time::interval_at(start, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    Some(interval)
}

/// Watches Jobs in one namespace or the whole cluster
pub struct JobInformer {
    client: Client,
    namespace: Option<String>,
    resync_period: Duration,
}

impl JobInformer {
    /// `resync_period` of zero disables resync
    pub fn new(client: Client, namespace: Option<String>, resync_period: Duration) -> Self {
        Self {
            client,
            namespace: namespace.filter(|ns| !ns.is_empty()),
            resync_period,
        }
    }

    fn namespace_log_value(&self) -> &str {
        self.namespace.as_deref().unwrap_or("all")
    }

    fn events(&self) -> BoxStream<'static, Result<watcher::Event<Job>, watcher::Error>> {
        let api: Api<Job> = match &self.namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        };
        watcher(api, watcher::Config::default())
            .default_backoff()
            .boxed()
    }

    /// Run until `cancel` fires. Only a failure before the first sync is fatal;
    /// later errors are retried with backoff.
    pub async fn run(
        self,
        handler: Arc<dyn JobEventHandler>,
        cancel: CancellationToken,
    ) -> Result<()> {
        info!(
            namespace = self.namespace_log_value(),
            resync_period = ?self.resync_period,
            "Starting job informer"
        );

        let mut events = self.events();
        let mut cache = JobCache::new();
        let mut resync: Option<Interval> = None;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tick(&mut resync) => {
                    debug!(jobs = cache.len(), "Resyncing job cache");
                    dispatch(handler.as_ref(), cache.resync(), &cancel).await;
                }
                next = events.next() => match next {
                    None => break,
                    Some(Err(e)) if !cache.is_synced() => {
                        return Err(e).context("Failed to list jobs");
                    }
                    Some(Err(e)) => warn!(error = %e, "Job watch failed, retrying"),
                    Some(Ok(event)) => {
                        let was_synced = cache.is_synced();
                        let pairs = cache.apply(event);
                        if !was_synced && cache.is_synced() {
                            handler.on_synced(cache.len()).await;
                            resync = resync_interval(self.resync_period);
                        }
                        dispatch(handler.as_ref(), pairs, &cancel).await;
                    }
                },
            }
        }

        info!("Job informer stopped");
        Ok(())
    }
}

/// Pending forever when resync is disabled
async fn tick(resync: &mut Option<Interval>) {
    match resync {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Hand pairs to the handler in order; abandoned on cancel
async fn dispatch(
    handler: &dyn JobEventHandler,
    pairs: Vec<SnapshotPair>,
    cancel: &CancellationToken,
) {
    if pairs.is_empty() {
        return;
    }
    let deliver = async {
        for (previous, current) in &pairs {
            handler.on_update(previous, current).await;
        }
    };
    tokio::select! {
        _ = cancel.cancelled() => debug!("Shutdown requested, abandoning pending updates"),
        _ = deliver => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::batch::v1::{JobCondition, JobStatus};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn job(name: &str, succeeded: i32, failed: bool) -> Job {
        let conditions = failed.then(|| {
            vec![JobCondition {
                type_: "Failed".to_string(),
                status: "True".to_string(),
                ..Default::default()
            }]
        });
        Job {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some("default".to_string()),
                ..Default::default()
            },
            status: Some(JobStatus {
                succeeded: Some(succeeded),
                conditions,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn key(name: &str) -> JobKey {
        JobKey::new("default", name)
    }

    fn listed(cache: &mut JobCache, jobs: Vec<Job>) -> Vec<SnapshotPair> {
        cache.apply(watcher::Event::Init);
        for job in jobs {
            cache.apply(watcher::Event::InitApply(job));
        }
        cache.apply(watcher::Event::InitDone)
    }

    #[test]
    fn test_initial_list_populates_silently() {
        let mut cache = JobCache::new();
        let pairs = listed(&mut cache, vec![job("a", 1, false), job("b", 0, false)]);

        assert!(pairs.is_empty());
        assert_eq!(cache.len(), 2);
        assert!(cache.is_synced());
    }

    #[test]
    fn test_not_synced_until_listing_done() {
        let mut cache = JobCache::new();
        cache.apply(watcher::Event::Init);
        cache.apply(watcher::Event::InitApply(job("a", 0, false)));

        assert!(!cache.is_synced());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_relist_emits_pairs_and_drops_missing() {
        let mut cache = JobCache::new();
        listed(&mut cache, vec![job("a", 0, false), job("b", 0, false)]);

        let pairs = listed(&mut cache, vec![job("a", 1, false), job("c", 0, false)]);

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0.succeeded, 0);
        assert_eq!(pairs[0].1.succeeded, 1);
        assert!(cache.get(&key("b")).is_none());
        assert!(cache.get(&key("c")).is_some());
    }

    #[test]
    fn test_apply_unknown_job_is_silent() {
        let mut cache = JobCache::new();
        assert!(cache.apply(watcher::Event::Apply(job("a", 1, false))).is_empty());
        assert_eq!(cache.get(&key("a")).unwrap().succeeded, 1);
    }

    #[test]
    fn test_apply_emits_previous_and_current() {
        let mut cache = JobCache::new();
        cache.apply(watcher::Event::Apply(job("a", 0, false)));

        let pairs = cache.apply(watcher::Event::Apply(job("a", 0, true)));

        assert_eq!(pairs.len(), 1);
        assert!(!pairs[0].0.failed);
        assert!(pairs[0].1.failed);
        assert!(cache.get(&key("a")).unwrap().failed);
    }

    #[test]
    fn test_delete_removes() {
        let mut cache = JobCache::new();
        cache.apply(watcher::Event::Apply(job("a", 0, false)));
        cache.apply(watcher::Event::Delete(job("a", 0, false)));

        assert!(cache.is_empty());
    }

    #[test]
    fn test_resync_redelivers_unchanged_pairs() {
        let mut cache = JobCache::new();
        listed(&mut cache, vec![job("a", 1, false), job("b", 0, true)]);

        let pairs = cache.resync();

        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|(previous, current)| previous == current));
    }

    #[test]
    fn test_nameless_job_is_skipped() {
        let mut cache = JobCache::new();
        assert!(cache.apply(watcher::Event::Apply(Job::default())).is_empty());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_resync_interval_bounds() {
        assert!(resync_interval(Duration::ZERO).is_none());
        assert!(resync_interval(Duration::from_secs(u64::MAX)).is_none());
        assert!(resync_interval(Duration::from_secs(30)).is_some());
    }
}
