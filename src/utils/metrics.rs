//! Prometheus metrics service for PoolWatch

use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::Instant;
use tracing::info;

/// Metrics service for Prometheus
#[derive(Clone)]
pub struct MetricsService {
    registry: Registry,
    start_time: Instant,

    pub cycles: CounterVec,
    pub alerts: CounterVec,
    pub base_reserve: Gauge,
    pub quote_reserve: Gauge,
    pub fetch_latency: HistogramVec,
    pub uptime: Gauge,
}

impl MetricsService {
    /// Create a new metrics service
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let cycles = CounterVec::new(
            Opts::new("poolwatch_cycles_total", "Detection cycles by outcome"),
            &["outcome"],
        )?;
        let alerts = CounterVec::new(
            Opts::new("poolwatch_alerts_total", "Liquidity alerts by delivery result"),
            &["delivery"],
        )?;
        let base_reserve = Gauge::new("poolwatch_base_reserve", "Last observed base reserve")?;
        let quote_reserve = Gauge::new("poolwatch_quote_reserve", "Last observed quote reserve")?;
        let fetch_latency = HistogramVec::new(
            HistogramOpts::new("poolwatch_fetch_latency_seconds", "Pool fetch latency")
                .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 15.0]),
            &["result"],
        )?;
        let uptime = Gauge::new("poolwatch_uptime_seconds", "Application uptime")?;

        registry.register(Box::new(cycles.clone()))?;
        registry.register(Box::new(alerts.clone()))?;
        registry.register(Box::new(base_reserve.clone()))?;
        registry.register(Box::new(quote_reserve.clone()))?;
        registry.register(Box::new(fetch_latency.clone()))?;
        registry.register(Box::new(uptime.clone()))?;

        info!(target: "METRICS", "Prometheus metrics initialized");

        Ok(Self {
            registry,
            start_time: Instant::now(),
            cycles,
            alerts,
            base_reserve,
            quote_reserve,
            fetch_latency,
            uptime,
        })
    }

    /// Record the outcome of one cycle
    pub fn record_cycle(&self, outcome: &str) {
        self.cycles.with_label_values(&[outcome]).inc();
    }

    /// Record an alert delivery attempt
    pub fn record_alert(&self, delivered: bool) {
        let label = if delivered { "sent" } else { "failed" };
        self.alerts.with_label_values(&[label]).inc();
    }

    pub fn observe_fetch(&self, result: &str, seconds: f64) {
        self.fetch_latency.with_label_values(&[result]).observe(seconds);
    }

    pub fn set_reserves(&self, base: f64, quote: f64) {
        self.base_reserve.set(base);
        self.quote_reserve.set(quote);
    }

    /// Total cycles recorded across all outcomes
    pub fn total_cycles(&self) -> u64 {
        ["snapshot", "absent", "fetch_error"]
            .iter()
            .map(|outcome| self.cycles.with_label_values(&[*outcome]).get() as u64)
            .sum()
    }

    pub fn uptime_seconds(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Get metrics as Prometheus text format
    pub fn get_metrics(&self) -> Result<String, prometheus::Error> {
        self.uptime.set(self.uptime_seconds());

        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
