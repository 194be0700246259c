//! Liquidity Watcher - polls a single pool and alerts on large base reserve moves

use parking_lot::RwLock;
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{interval, timeout, Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::change_detector::{detect, Detection};
use super::snapshot::{Snapshot, SnapshotStore};
use crate::config::Config;
use crate::error::FetchError;
use crate::utils::alerts::format_liquidity_alert;
use crate::utils::{MetricsService, Notifier, PoolStateFetcher, SolanaService};

/// Watcher status exposed over the status server
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatcherStatus {
    pub pool_id: String,
    pub change_threshold: f64,
    pub poll_interval_secs: u64,
    pub is_running: bool,
    pub snapshot: Option<Snapshot>,
}

/// Liquidity watcher module
#[derive(Clone)]
pub struct LiquidityWatcher {
    pool_id: Pubkey,
    change_threshold: f64,
    poll_interval: Duration,
    fetch_timeout: Duration,
    retain_snapshot_on_error: bool,

    fetcher: Arc<dyn PoolStateFetcher>,
    notifier: Arc<dyn Notifier>,
    metrics: Arc<MetricsService>,

    is_running: Arc<AtomicBool>,
    store: Arc<RwLock<SnapshotStore>>,
}

impl LiquidityWatcher {
    /// Create a new liquidity watcher
    pub fn new(
        config: &Config,
        fetcher: Arc<dyn PoolStateFetcher>,
        notifier: Arc<dyn Notifier>,
        metrics: Arc<MetricsService>,
    ) -> Self {
        Self {
            pool_id: config.pool_id,
            change_threshold: config.change_threshold,
            poll_interval: config.poll_interval,
            fetch_timeout: config.rpc_timeout,
            retain_snapshot_on_error: config.retain_snapshot_on_error,
            fetcher,
            notifier,
            metrics,
            is_running: Arc::new(AtomicBool::new(false)),
            store: Arc::new(RwLock::new(SnapshotStore::new())),
        }
    }

    /// Run detection cycles until stopped.
    ///
    /// Cycles never overlap: each one is awaited before the next tick is
    /// taken, and ticks missed while a cycle was running are skipped.
    pub async fn run(&self) {
        if self.is_running.swap(true, Ordering::SeqCst) {
            warn!(target: "WATCHER", "Already running");
            return;
        }

        info!(
            target: "WATCHER",
            "🔍 Watching pool {} every {}s (threshold {:.2}%)",
            SolanaService::shorten_address(&self.pool_id.to_string(), 4),
            self.poll_interval.as_secs(),
            self.change_threshold * 100.0
        );

        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while self.is_running.load(Ordering::SeqCst) {
            ticker.tick().await;
            if !self.is_running.load(Ordering::SeqCst) {
                break;
            }
            self.run_cycle().await;
        }

        info!(target: "WATCHER", "Liquidity watcher stopped");
    }

    /// Stop the watcher after the current cycle
    pub fn stop(&self) {
        self.is_running.store(false, Ordering::SeqCst);
        info!(target: "WATCHER", "Liquidity watcher stopping...");
    }

    /// Execute one fetch, detect, notify, store cycle
    pub async fn run_cycle(&self) -> Detection {
        let fetch = self.fetch_current().await;
        let fetch_failed = fetch.is_err();

        let current = match fetch {
            Ok(Some(snapshot)) => {
                self.metrics.record_cycle("snapshot");
                self.metrics
                    .set_reserves(snapshot.base_amount, snapshot.quote_amount);
                debug!(
                    target: "WATCHER",
                    "Observed base={} quote={} at slot {}",
                    snapshot.base_amount,
                    snapshot.quote_amount,
                    snapshot.slot
                );
                Some(snapshot)
            }
            Ok(None) => {
                self.metrics.record_cycle("absent");
                warn!(target: "WATCHER", "Pool account {} not found", self.pool_id);
                None
            }
            Err(e) => {
                self.metrics.record_cycle("fetch_error");
                error!(target: "WATCHER", "Pool fetch failed ({}): {}", e.kind(), e);
                None
            }
        };

        let previous = self.store.read().previous().cloned();
        let detection = detect(previous.as_ref(), current.as_ref(), self.change_threshold);

        if let Detection::Alert(change) = &detection {
            let message = format_liquidity_alert(&self.pool_id, change);
            error!(
                target: "RUG_ALERT",
                "🚨 Base reserve {} {:.2}%: {} -> {}",
                change.direction,
                change.relative_change * 100.0,
                change.previous_base,
                change.current_base
            );

            match self.notifier.notify(&message).await {
                Ok(()) => {
                    self.metrics.record_alert(true);
                    info!(target: "ALERTS", "Alert delivered");
                }
                Err(e) => {
                    self.metrics.record_alert(false);
                    error!(target: "ALERTS", "Alert delivery failed: {}", e);
                }
            }
        }

        if fetch_failed && self.retain_snapshot_on_error {
            debug!(target: "WATCHER", "Keeping last snapshot after fetch error");
        } else {
            self.store.write().replace(current);
        }

        detection
    }

    async fn fetch_current(&self) -> Result<Option<Snapshot>, FetchError> {
        let started = Instant::now();
        let result = match timeout(self.fetch_timeout, self.fetcher.fetch(&self.pool_id)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.fetch_timeout.as_secs())),
        };

        let label = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        self.metrics
            .observe_fetch(label, started.elapsed().as_secs_f64());

        result
    }

    /// Copy of the stored snapshot
    pub fn latest_snapshot(&self) -> Option<Snapshot> {
        self.store.read().previous().cloned()
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }

    pub fn get_status(&self) -> WatcherStatus {
        WatcherStatus {
            pool_id: self.pool_id.to_string(),
            change_threshold: self.change_threshold,
            poll_interval_secs: self.poll_interval.as_secs(),
            is_running: self.is_running(),
            snapshot: self.latest_snapshot(),
        }
    }
}
