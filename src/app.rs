//! Wiring - channels, coordinator and informer from a `Config`

use anyhow::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Config;
use crate::notification::{
    NotificationCoordinator, NotificationDispatcher, SlackNotifier, WebhookConfig, WebhookNotifier,
};
use crate::watch::{self, JobInformer};

/// Register every configured channel
pub fn build_dispatcher(config: &Config) -> Result<NotificationDispatcher> {
    let mut dispatcher = NotificationDispatcher::new().with_dry_run(config.dry_run);

    if let Some(url) = config.slack_webhook_url.as_deref().filter(|u| !u.is_empty()) {
        dispatcher.register_channel(Arc::new(SlackNotifier::new(url)?));
    }

    if let Some(url) = config.webhook_url.as_deref().filter(|u| !u.is_empty()) {
        let mut webhook = WebhookConfig::new(url);
        webhook.token = config.webhook_token.clone().filter(|t| !t.is_empty());
        webhook.timeout_secs = config.delivery_timeout;
        dispatcher.register_channel(Arc::new(WebhookNotifier::new(webhook)?));
    }

    Ok(dispatcher)
}

pub fn build_coordinator(config: &Config) -> Result<NotificationCoordinator> {
    let dispatcher = build_dispatcher(config)?;
    Ok(NotificationCoordinator::new(Arc::new(dispatcher), config.notification_level)
        .with_delivery_timeout(config.delivery_timeout()))
}

/// Run the informer until `cancel` fires
pub async fn run(config: Config, cancel: CancellationToken) -> Result<()> {
    config.validate()?;

    info!(
        namespace = config.namespace_log_value(),
        in_cluster = config.in_cluster,
        resync_period = ?config.resync_period(),
        notification_level = %config.notification_level,
        dry_run = config.dry_run,
        "Loaded configuration"
    );

    let client = watch::connect(config.in_cluster, config.kubeconfig.as_deref()).await?;
    let coordinator = Arc::new(build_coordinator(&config)?);

    let informer = JobInformer::new(client, config.namespace_filter(), config.resync_period());
    informer.run(coordinator, cancel).await
}
