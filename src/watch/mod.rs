//! Kubernetes side - credentials, Job projection and the Job informer

pub mod config;
pub mod informer;
pub mod snapshot;

pub use config::{connect, load_config};
pub use informer::{resync_interval, JobCache, JobEventHandler, JobInformer, SnapshotPair};
pub use snapshot::{is_condition_failed, job_key, snapshot};
