//! 通用 JSON webhook 渠道

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::notification::channel::{DeliveryError, Notifier};
use crate::notification::event::{NotificationEvent, Outcome};

/// Webhook 渠道配置
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Endpoint receiving the POST
    pub url: String,
    /// Bearer token（可选）
    pub token: Option<String>,
    /// Client-side request timeout (seconds)
    pub timeout_secs: u64,
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
            timeout_secs: 10,
        }
    }
}

/// Webhook 请求体
#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub namespace: &'a str,
    pub name: &'a str,
    pub outcome: Outcome,
    pub observed_at: DateTime<Utc>,
    pub summary: &'a str,
}

impl<'a> WebhookPayload<'a> {
    pub fn new(event: &'a NotificationEvent, summary: &'a str) -> Self {
        Self {
            namespace: &event.key.namespace,
            name: &event.key.name,
            outcome: event.outcome,
            observed_at: event.observed_at,
            summary,
        }
    }
}

/// POSTs a JSON document per notification; any 2xx counts as delivered
#[derive(Debug)]
pub struct WebhookNotifier {
    client: Client,
    config: WebhookConfig,
}

impl WebhookNotifier {
    /// 创建 webhook 渠道
    pub fn new(config: WebhookConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client for webhook")?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn deliver(&self, event: &NotificationEvent, summary: &str) -> Result<(), DeliveryError> {
        let mut request = self
            .client
            .post(&self.config.url)
            .json(&WebhookPayload::new(event, summary));

        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|source| DeliveryError::Transport {
            channel: "webhook".to_string(),
            source,
        })?;

        if !response.status().is_success() {
            return Err(DeliveryError::Status {
                channel: "webhook".to_string(),
                status: response.status().as_u16(),
            });
        }

        debug!(channel = "webhook", job = %event.key, "Webhook notification sent");
        Ok(())
    }
}
