//! 具体渠道实现

pub mod slack;
pub mod webhook;

pub use slack::SlackNotifier;
pub use webhook::{WebhookConfig, WebhookNotifier};
