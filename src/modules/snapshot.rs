//! Pool reserve snapshots and the single-slot snapshot store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observation of the pool's vault reserves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Base vault balance, ui-scaled
    pub base_amount: f64,
    /// Quote vault balance, ui-scaled
    pub quote_amount: f64,
    pub observed_at: DateTime<Utc>,
    /// Slot the pool account was read at
    pub slot: u64,
}

impl Snapshot {
    pub fn new(base_amount: f64, quote_amount: f64, slot: u64) -> Self {
        Self {
            base_amount,
            quote_amount,
            observed_at: Utc::now(),
            slot,
        }
    }
}

/// Holds the most recent observation. Empty until the first cycle completes.
#[derive(Debug, Default, Clone)]
pub struct SnapshotStore {
    previous: Option<Snapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous(&self) -> Option<&Snapshot> {
        self.previous.as_ref()
    }

    /// Replace the stored observation, clearing it when `current` is `None`
    pub fn replace(&mut self, current: Option<Snapshot>) -> Option<Snapshot> {
        std::mem::replace(&mut self.previous, current)
    }
}
