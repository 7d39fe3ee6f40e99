//! job-notify CLI
//!
//! Watches Kubernetes Jobs and sends one notification per completion.

use anyhow::Result;
use clap::Parser;
use job_notify::Config;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Cancel `cancel` on SIGINT or SIGTERM
fn spawn_signal_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    error!(error = %e, "Failed to install SIGTERM handler");
                    let _ = tokio::signal::ctrl_c().await;
                    info!(signal = "SIGINT", "Received signal, shutting down");
                    cancel.cancel();
                    return;
                }
            };
            let signal = tokio::select! {
                _ = tokio::signal::ctrl_c() => "SIGINT",
                _ = sigterm.recv() => "SIGTERM",
            };
            info!(signal, "Received signal, shutting down");
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
            info!(signal = "SIGINT", "Received signal, shutting down");
        }
        cancel.cancel();
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG overrides, e.g. RUST_LOG=job_notify=debug
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("job_notify=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let config = Config::parse();

    let cancel = CancellationToken::new();
    spawn_signal_listener(cancel.clone());

    if let Err(e) = job_notify::app::run(config, cancel).await {
        error!(error = %format!("{:#}", e), "Failed to run");
        std::process::exit(1);
    }

    info!("Shut down cleanly");
    Ok(())
}
