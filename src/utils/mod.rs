//! Utility modules

pub mod alerts;
pub mod logger;
pub mod metrics;
pub mod raydium;
pub mod solana;

pub use alerts::{Notifier, TelegramNotifier};
pub use logger::init_logger;
pub use metrics::MetricsService;
pub use solana::{PoolStateFetcher, SolanaService};
