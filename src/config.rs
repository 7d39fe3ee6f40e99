//! Runtime configuration - CLI flags with environment fallbacks

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::notification::NotificationLevel;

fn parse_level(value: &str) -> Result<NotificationLevel, String> {
    value.parse()
}

/// job-notify - one notification per Kubernetes Job completion
#[derive(Debug, Clone, Parser)]
#[command(name = "job-notify")]
#[command(about = "Watch Kubernetes Jobs and notify Slack or a webhook when they finish")]
#[command(version)]
pub struct Config {
    /// Slack incoming webhook URL
    #[arg(long, env = "SLACK_WEBHOOK_URL", hide_env_values = true)]
    pub slack_webhook_url: Option<String>,

    /// Generic webhook receiving a JSON document per notification
    #[arg(long, env = "WEBHOOK_URL", hide_env_values = true)]
    pub webhook_url: Option<String>,

    /// Bearer token sent to the generic webhook
    #[arg(long, env = "WEBHOOK_TOKEN", hide_env_values = true)]
    pub webhook_token: Option<String>,

    /// Namespace to watch (empty: all namespaces)
    #[arg(long, env = "NAMESPACE", default_value = "")]
    pub namespace: String,

    /// Use the pod's service account instead of a kubeconfig
    #[arg(
        long,
        env = "IN_CLUSTER",
        default_value_t = true,
        action = clap::ArgAction::Set,
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub in_cluster: bool,

    /// Kubeconfig path when not in cluster (default: $KUBECONFIG, then ~/.kube/config)
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// Resync period in seconds (0 disables resync)
    #[arg(long, env = "RESYNC_PERIOD", default_value_t = 30)]
    pub resync_period: u64,

    /// Which outcomes to notify: all, failed
    #[arg(long, env = "NOTIFICATION_LEVEL", default_value = "all", value_parser = parse_level)]
    pub notification_level: NotificationLevel,

    /// Deadline for a single delivery, in seconds
    #[arg(long, env = "DELIVERY_TIMEOUT", default_value_t = 10)]
    pub delivery_timeout: u64,

    /// Log notifications instead of sending them
    #[arg(long, env = "DRY_RUN")]
    pub dry_run: bool,
}

impl Config {
    /// Checks clap cannot express
    pub fn validate(&self) -> Result<()> {
        let has_channel = self.slack_webhook_url.as_deref().is_some_and(|u| !u.is_empty())
            || self.webhook_url.as_deref().is_some_and(|u| !u.is_empty());
        if !has_channel && !self.dry_run {
            bail!("SLACK_WEBHOOK_URL or WEBHOOK_URL is required (or use --dry-run)");
        }
        if self.delivery_timeout == 0 {
            bail!("DELIVERY_TIMEOUT must be at least 1 second");
        }
        Ok(())
    }

    /// `None` means all namespaces
    pub fn namespace_filter(&self) -> Option<String> {
        Some(self.namespace.trim().to_string()).filter(|ns| !ns.is_empty())
    }

    pub fn namespace_log_value(&self) -> &str {
        match self.namespace.trim() {
            "" => "all",
            ns => ns,
        }
    }

    pub fn resync_period(&self) -> Duration {
        Duration::from_secs(self.resync_period)
    }

    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_secs(self.delivery_timeout)
    }
}
