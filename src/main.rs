//! PoolWatch - Raydium pool liquidity watcher
//!
//! Polls the vault balances of a single AMM v4 pool and sends a Telegram
//! alert when the base reserve moves by more than the configured fraction
//! between two consecutive observations.
//!
//! This is a **monitoring-only** tool - no wallet or trading functionality.

mod config;
mod error;
mod modules;
mod status;
mod utils;

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use config::Config;
use modules::LiquidityWatcher;
use status::StatusServer;
use utils::{init_logger, MetricsService, SolanaService, TelegramNotifier};

/// PoolWatch application
pub struct PoolWatch {
    config: Config,
    metrics: Arc<MetricsService>,
    watcher: LiquidityWatcher,
}

impl PoolWatch {
    /// Create a new PoolWatch instance
    pub fn new(config: Config) -> Result<Self> {
        let metrics = Arc::new(MetricsService::new().context("failed to register metrics")?);
        let solana = Arc::new(SolanaService::new(&config));
        let notifier =
            Arc::new(TelegramNotifier::new(&config).context("failed to build Telegram client")?);

        let watcher = LiquidityWatcher::new(&config, solana, notifier, Arc::clone(&metrics));

        Ok(Self {
            config,
            metrics,
            watcher,
        })
    }

    /// Start the status server (if enabled) and the watcher loop
    pub async fn start(&self) -> Result<()> {
        info!(target: "POOLWATCH", "Initializing PoolWatch...");

        if let Some(port) = self.config.status_port {
            let server = StatusServer::new(port, self.watcher.clone(), Arc::clone(&self.metrics));
            tokio::spawn(async move {
                if let Err(e) = server.start().await {
                    error!(target: "STATUS", "Status server failed: {}", e);
                }
            });
        }

        self.watcher.run().await;

        Ok(())
    }

    /// Graceful shutdown
    pub async fn shutdown(&self) {
        info!(target: "POOLWATCH", "Shutting down...");
        self.watcher.stop();
        info!(target: "POOLWATCH", "✅ Shutdown complete");
    }
}

async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<(), anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        result = ctrl_c => result,
        result = terminate => result,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(target: "POOLWATCH", "Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    let poolwatch = PoolWatch::new(config)?;

    tokio::select! {
        result = poolwatch.start() => {
            if let Err(e) = result {
                error!(target: "POOLWATCH", "Fatal error: {}", e);
                return Err(e);
            }
        }
        result = shutdown_signal() => {
            result?;
            poolwatch.shutdown().await;
        }
    }

    Ok(())
}
