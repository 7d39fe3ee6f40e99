//! Slack 渠道（incoming webhook）

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::notification::channel::{DeliveryError, Notifier};
use crate::notification::event::NotificationEvent;

/// Client-side request timeout, independent of the coordinator deadline
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Slack webhook 消息体
#[derive(Debug, Serialize)]
pub struct SlackMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<SlackBlock>,
}

#[derive(Debug, Serialize)]
pub struct SlackBlock {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<SlackText>,
}

#[derive(Debug, Serialize)]
pub struct SlackText {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

impl SlackMessage {
    /// Single mrkdwn section block
    pub fn section(text: impl Into<String>) -> Self {
        Self {
            text: None,
            blocks: vec![SlackBlock {
                kind: "section",
                text: Some(SlackText {
                    kind: "mrkdwn",
                    text: text.into(),
                }),
            }],
        }
    }
}

/// Slack 渠道
#[derive(Debug)]
pub struct SlackNotifier {
    webhook_url: String,
    client: Client,
}

impl SlackNotifier {
    /// 创建 Slack 渠道
    pub fn new(webhook_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client for Slack")?;

        Ok(Self {
            webhook_url: webhook_url.into(),
            client,
        })
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    fn name(&self) -> &str {
        "slack"
    }

    async fn deliver(&self, event: &NotificationEvent, summary: &str) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&SlackMessage::section(summary))
            .send()
            .await
            .map_err(|source| DeliveryError::Transport {
                channel: "slack".to_string(),
                source,
            })?;

        // Slack answers exactly 200 on success
        if response.status() != StatusCode::OK {
            return Err(DeliveryError::Status {
                channel: "slack".to_string(),
                status: response.status().as_u16(),
            });
        }

        debug!(channel = "slack", job = %event.key, "Slack notification sent");
        Ok(())
    }
}
