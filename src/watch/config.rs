//! Cluster connection - in-cluster service account or kubeconfig
//!
//! Out-of-cluster credentials come from the current kubeconfig context,
//! including exec plugins and auth providers. Without an explicit path the
//! usual `KUBECONFIG` / `~/.kube/config` lookup applies.

use anyhow::{Context, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::Path;
use tracing::info;

/// Resolve client settings without connecting
pub async fn load_config(in_cluster: bool, kubeconfig: Option<&Path>) -> Result<Config> {
    if in_cluster {
        return Config::incluster().context("Failed to load in-cluster service account credentials");
    }

    let options = KubeConfigOptions::default();
    match kubeconfig {
        Some(path) => {
            let kubeconfig = Kubeconfig::read_from(path)
                .with_context(|| format!("Failed to read kubeconfig {}", path.display()))?;
            Config::from_custom_kubeconfig(kubeconfig, &options)
                .await
                .with_context(|| format!("Invalid kubeconfig {}", path.display()))
        }
        None => Config::from_kubeconfig(&options)
            .await
            .context("Failed to load kubeconfig"),
    }
}

/// Build an API client for the selected credentials
pub async fn connect(in_cluster: bool, kubeconfig: Option<&Path>) -> Result<Client> {
    let config = load_config(in_cluster, kubeconfig).await?;
    info!(cluster_url = %config.cluster_url, in_cluster, "Connecting to Kubernetes API");
    Client::try_from(config).context("Failed to create Kubernetes client")
}
