//! 通知渠道 trait 定义

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use super::event::NotificationEvent;

/// 渠道发送失败的原因
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Endpoint answered with a non-success status
    #[error("{channel} returned non-OK status: {status}")]
    Status { channel: String, status: u16 },
    /// Request never got a response
    #[error("failed to send {channel} notification: {source}")]
    Transport {
        channel: String,
        #[source]
        source: reqwest::Error,
    },
    /// Deadline passed before the channel answered
    #[error("delivery timed out after {0:?}")]
    Timeout(Duration),
    /// One or more fan-out channels failed
    #[error("{failed} of {total} channels failed")]
    Partial { failed: usize, total: usize },
}

/// 通知渠道 trait
///
/// 每个新的目的地实现这个 trait。调用方负责为每次调用设置超时。
#[async_trait]
pub trait Notifier: Send + Sync {
    /// 渠道名称（用于日志）
    fn name(&self) -> &str;

    /// 发送一条通知
    async fn deliver(&self, event: &NotificationEvent, summary: &str) -> Result<(), DeliveryError>;
}
