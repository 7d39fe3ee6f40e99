//! 通知分发器 - 管理多个渠道并把一条通知发送到每个渠道

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use super::channel::{DeliveryError, Notifier};
use super::event::NotificationEvent;

/// 通知分发器，本身也是一个 `Notifier`
pub struct NotificationDispatcher {
    channels: Vec<Arc<dyn Notifier>>,
    dry_run: bool,
}

impl NotificationDispatcher {
    /// 创建新的分发器
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
            dry_run: false,
        }
    }

    /// 设置 dry-run 模式（只记录日志，不实际发送）
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 注册渠道
    pub fn register_channel(&mut self, channel: Arc<dyn Notifier>) {
        info!(channel = channel.name(), "Registering notification channel");
        self.channels.push(channel);
    }

    /// 获取已注册的渠道数量
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// 获取已注册的渠道名称
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for NotificationDispatcher {
    fn name(&self) -> &str {
        if self.dry_run {
            "dry-run"
        } else {
            "dispatcher"
        }
    }

    /// 每个渠道只尝试一次；任一渠道失败则返回错误
    async fn deliver(
        &self,
        event: &NotificationEvent,
        summary: &str,
    ) -> Result<(), DeliveryError> {
        if self.dry_run {
            info!(
                job = %event.key,
                outcome = %event.outcome,
                channels = ?self.channel_names(),
                summary = %summary,
                "[DRY-RUN] Would send notification"
            );
            return Ok(());
        }

        let mut failed = 0;
        for channel in &self.channels {
            if let Err(e) = channel.deliver(event, summary).await {
                warn!(
                    channel = channel.name(),
                    job = %event.key,
                    error = %e,
                    "Channel send failed"
                );
                failed += 1;
            }
        }

        if failed > 0 {
            return Err(DeliveryError::Partial {
                failed,
                total: self.channels.len(),
            });
        }
        Ok(())
    }
}
