//! Job domain model - snapshots of Job resources and completion-edge detection

pub mod classifier;
pub mod snapshot;

pub use classifier::{classify, is_failed_edge, Transition};
pub use snapshot::{JobKey, JobSnapshot};
