//! job-notify - watch Kubernetes Jobs and send one notification per completion

pub mod app;
pub mod clock;
pub mod config;
pub mod job;
pub mod notification;
pub mod watch;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use job::{classify, JobKey, JobSnapshot, Transition};
pub use notification::{
    DeliveryError, HandleOutcome, InMemoryNotifiedStore, MessageFormatter, NotificationCoordinator,
    NotificationDispatcher, NotificationEvent, NotificationLevel, NotifiedStore, Notifier, Outcome,
    SlackNotifier, WebhookConfig, WebhookNotifier,
};
pub use watch::{JobCache, JobEventHandler, JobInformer};
