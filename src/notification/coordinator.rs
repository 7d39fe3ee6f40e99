//! Notification coordinator - turns snapshot pairs into at most one notification per Job
//!
//! Every `(previous, current)` pair from the informer goes through:
//! 1. classification (did a terminal edge just happen?)
//! 2. dedup (has this Job already been handled?), marked before delivery
//! 3. notification level (does the policy want this outcome?)
//! 4. a single delivery attempt bounded by a deadline
//!
//! Delivery is best-effort: a failed or timed-out attempt is logged and the Job
//! stays marked, so it is never retried.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use super::channel::{DeliveryError, Notifier};
use super::event::{NotificationEvent, Outcome};
use super::formatter::MessageFormatter;
use super::level::NotificationLevel;
use super::store::{InMemoryNotifiedStore, NotifiedStore};
use crate::clock::{Clock, SystemClock};
use crate::job::{classify, is_failed_edge, JobSnapshot, Transition};
use crate::watch::JobEventHandler;

/// Default per-delivery deadline
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// What `handle` did with a snapshot pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleOutcome {
    /// Snapshots belong to different Jobs
    Malformed,
    /// No terminal edge
    NoTransition,
    /// Job was already notified
    Duplicate,
    /// Edge recorded but filtered by the notification level
    PolicySuppressed,
    /// Channel accepted the notification
    Delivered,
    /// Channel failed or timed out; not retried
    DeliveryFailed,
}

/// Owns the dedup store and the single path to the notification channel
pub struct NotificationCoordinator {
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn NotifiedStore>,
    clock: Arc<dyn Clock>,
    level: NotificationLevel,
    delivery_timeout: Duration,
}

impl NotificationCoordinator {
    /// In-memory dedup store, system clock, 10 second delivery deadline
    pub fn new(notifier: Arc<dyn Notifier>, level: NotificationLevel) -> Self {
        Self {
            notifier,
            store: Arc::new(InMemoryNotifiedStore::new()),
            clock: Arc::new(SystemClock),
            level,
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn NotifiedStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_delivery_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = timeout;
        self
    }

    pub fn level(&self) -> NotificationLevel {
        self.level
    }

    /// Process one snapshot pair
    pub async fn handle(&self, previous: &JobSnapshot, current: &JobSnapshot) -> HandleOutcome {
        if previous.key != current.key {
            debug!(
                previous = %previous.key,
                current = %current.key,
                "Discarding snapshot pair with mismatched keys"
            );
            return HandleOutcome::Malformed;
        }

        let outcome = match self.outcome_for(previous, current) {
            Some(outcome) => outcome,
            None => return HandleOutcome::NoTransition,
        };

        let key = &current.key;
        if self.store.contains(key) || !self.store.mark_added(key) {
            debug!(job = %key, outcome = %outcome, "Job already notified, skipping");
            return HandleOutcome::Duplicate;
        }

        let observed_at = self.observed_at(current, outcome);
        let event = NotificationEvent::new(key.clone(), outcome, observed_at);

        if !self.level.admits(outcome) {
            debug!(
                job = %key,
                outcome = %outcome,
                level = %self.level,
                "Outcome filtered by notification level"
            );
            return HandleOutcome::PolicySuppressed;
        }

        info!(
            job = %key.name,
            namespace = %key.namespace,
            outcome = %outcome,
            channel = self.notifier.name(),
            "Job finished, sending notification"
        );

        match self.deliver(&event).await {
            Ok(()) => HandleOutcome::Delivered,
            Err(e) => {
                error!(
                    job = %key.name,
                    namespace = %key.namespace,
                    outcome = %outcome,
                    observed_at = %event.observed_at,
                    error = %e,
                    "Failed to send notification"
                );
                HandleOutcome::DeliveryFailed
            }
        }
    }

    /// Success wins a tie unless the level filters it out; then a failed edge
    /// in the same pair is reported instead
    fn outcome_for(&self, previous: &JobSnapshot, current: &JobSnapshot) -> Option<Outcome> {
        match classify(previous, current) {
            Transition::Succeeded
                if !self.level.admits(Outcome::Succeeded) && is_failed_edge(previous, current) =>
            {
                Some(Outcome::Failed)
            }
            transition => Outcome::from_transition(transition),
        }
    }

    fn observed_at(
        &self,
        current: &JobSnapshot,
        outcome: Outcome,
    ) -> chrono::DateTime<chrono::Utc> {
        match outcome {
            Outcome::Succeeded => current.completion_time.unwrap_or_else(|| self.clock.now()),
            Outcome::Failed => self.clock.now(),
        }
    }

    async fn deliver(&self, event: &NotificationEvent) -> Result<(), DeliveryError> {
        let summary = MessageFormatter::summary(event);
        let delivery = self.notifier.deliver(event, &summary);
        match tokio::time::timeout(self.delivery_timeout, delivery).await {
            Ok(result) => result,
            Err(_) => Err(DeliveryError::Timeout(self.delivery_timeout)),
        }
    }
}

#[async_trait]
impl JobEventHandler for NotificationCoordinator {
    async fn on_update(&self, previous: &JobSnapshot, current: &JobSnapshot) {
        self.handle(previous, current).await;
    }

    async fn on_synced(&self, jobs: usize) {
        info!(jobs, level = %self.level, "Job cache synced, watching for completions");
    }
}
