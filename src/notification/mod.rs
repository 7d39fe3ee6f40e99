//! 通知层 - 从快照对到每个 Job 完成的一条消息
//!
//! # 模块结构
//! 1. `coordinator`: classification, dedup, notification level, delivery deadline
//! 2. `store`: which Jobs have already been handled
//! 3. `channel`: the `Notifier` trait every destination implements
//! 4. `dispatcher`: fan-out over several channels, with dry-run
//!
//! # 使用示例
//! ```ignore
//! use job_notify::notification::{NotificationCoordinator, NotificationLevel, SlackNotifier};
//!
//! let slack = Arc::new(SlackNotifier::new(webhook_url)?);
//! let coordinator = NotificationCoordinator::new(slack, NotificationLevel::All);
//! coordinator.handle(&previous, &current).await;
//! ```

pub mod channel;
pub mod channels;
pub mod coordinator;
pub mod dispatcher;
pub mod event;
pub mod formatter;
pub mod level;
pub mod store;

pub use channel::{DeliveryError, Notifier};
pub use channels::{SlackNotifier, WebhookConfig, WebhookNotifier};
pub use coordinator::{HandleOutcome, NotificationCoordinator, DEFAULT_DELIVERY_TIMEOUT};
pub use dispatcher::NotificationDispatcher;
pub use event::{NotificationEvent, Outcome};
pub use formatter::MessageFormatter;
pub use level::NotificationLevel;
pub use store::{InMemoryNotifiedStore, NotifiedStore};
