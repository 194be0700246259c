//! Error types for PoolWatch

use thiserror::Error;

/// Startup configuration errors. Always fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Errors raised while fetching pool state. Recoverable per cycle.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("RPC request failed: {0}")]
    Network(String),

    #[error("Failed to decode pool account: {0}")]
    Decode(String),

    #[error("Pool fetch timed out after {0}s")]
    Timeout(u64),
}

impl FetchError {
    /// Short label used for logging and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::Decode(_) => "decode",
            FetchError::Timeout(_) => "timeout",
        }
    }
}

/// Errors raised by the notification transport. Recoverable per cycle.
#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Telegram request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram rejected message: {0}")]
    Rejected(String),
}
