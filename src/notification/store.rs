//! 通知去重存储 - 记录哪些 Job 已经发送过通知

use std::collections::HashSet;
use std::sync::RwLock;

use crate::job::JobKey;

/// Key-existence store for notified Jobs
///
/// `mark_added` must be atomic: when two callers race on one key exactly one
/// of them sees `true`.
pub trait NotifiedStore: Send + Sync {
    fn contains(&self, key: &JobKey) -> bool;

    /// Record `key`; returns `false` when it was already present
    fn mark_added(&self, key: &JobKey) -> bool;
}

/// 内存存储，生命周期与进程相同，条目不会过期
#[derive(Debug, Default)]
pub struct InMemoryNotifiedStore {
    keys: RwLock<HashSet<JobKey>>,
}

impl InMemoryNotifiedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.keys.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotifiedStore for InMemoryNotifiedStore {
    fn contains(&self, key: &JobKey) -> bool {
        self.keys
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(key)
    }

    fn mark_added(&self, key: &JobKey) -> bool {
        self.keys
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.clone())
    }
}
