//! Read-only HTTP status server: health, current snapshot and Prometheus metrics

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

use crate::modules::{LiquidityWatcher, WatcherStatus};
use crate::utils::MetricsService;

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: String,
    uptime_seconds: f64,
    cycles: u64,
    watcher_running: bool,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub watcher: LiquidityWatcher,
    pub metrics: Arc<MetricsService>,
}

/// Status server
pub struct StatusServer {
    port: u16,
    state: AppState,
}

impl StatusServer {
    pub fn new(port: u16, watcher: LiquidityWatcher, metrics: Arc<MetricsService>) -> Self {
        Self {
            port,
            state: AppState { watcher, metrics },
        }
    }

    /// Start serving; only returns on bind or serve failure
    pub async fn start(&self) -> anyhow::Result<()> {
        let app = router(self.state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(target: "STATUS", "Status server listening on http://{}", addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/status", get(get_status))
        .route("/metrics", get(get_metrics))
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        uptime_seconds: state.metrics.uptime_seconds(),
        cycles: state.metrics.total_cycles(),
        watcher_running: state.watcher.is_running(),
    })
}

async fn get_status(State(state): State<AppState>) -> Json<WatcherStatus> {
    Json(state.watcher.get_status())
}

async fn get_metrics(State(state): State<AppState>) -> Response {
    match state.metrics.get_metrics() {
        Ok(metrics) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            metrics,
        )
            .into_response(),
        Err(e) => {
            error!(target: "STATUS", "Failed to encode metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::{FetchError, NotificationError};
    use crate::modules::Snapshot;
    use crate::utils::{Notifier, PoolStateFetcher};
    use async_trait::async_trait;
    use solana_sdk::pubkey::Pubkey;
    use std::collections::HashMap;

    struct FixedFetcher;

    #[async_trait]
    impl PoolStateFetcher for FixedFetcher {
        async fn fetch(&self, _pool_id: &Pubkey) -> Result<Option<Snapshot>, FetchError> {
            Ok(Some(Snapshot::new(250.0, 3.5, 7)))
        }
    }

    struct SilentNotifier;

    #[async_trait]
    impl Notifier for SilentNotifier {
        async fn notify(&self, _message: &str) -> Result<(), NotificationError> {
            Ok(())
        }
    }

    fn state() -> AppState {
        let env = HashMap::from([
            ("RPC_URL", "http://localhost:8899".to_string()),
            ("POOL_ID", "EP2ib6dYdEeqD8MfE2ezHCxX3kP3K2eLKkirfPm5eyMx".to_string()),
            ("OPENBOOK_PROGRAM_ID", "srmqPvymJeFKQ4zGQed1GFppgkRHL9kaELCbyksJtPX".to_string()),
            ("TELEGRAM_BOT_TOKEN", "123:abc".to_string()),
            ("TELEGRAM_CHAT_ID", "42".to_string()),
        ]);
        let config = Config::from_lookup(|key| env.get(key).cloned()).unwrap();
        let metrics = Arc::new(MetricsService::new().unwrap());
        let watcher = crate::modules::LiquidityWatcher::new(
            &config,
            Arc::new(FixedFetcher),
            Arc::new(SilentNotifier),
            Arc::clone(&metrics),
        );
        AppState { watcher, metrics }
    }

    #[tokio::test]
    async fn status_reports_stored_snapshot() {
        let state = state();

        let Json(before) = get_status(State(state.clone())).await;
        assert!(before.snapshot.is_none());
        assert_eq!(before.change_threshold, 0.05);

        state.watcher.run_cycle().await;

        let Json(after) = get_status(State(state.clone())).await;
        assert_eq!(after.snapshot.map(|s| s.base_amount), Some(250.0));

        let Json(health) = health_check(State(state)).await;
        assert_eq!(health.cycles, 1);
        assert!(!health.watcher_running);
    }

    #[tokio::test]
    async fn metrics_endpoint_returns_text() {
        let response = get_metrics(State(state())).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
