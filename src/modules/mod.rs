//! PoolWatch monitoring modules

pub mod change_detector;
pub mod liquidity_watcher;
pub mod snapshot;

pub use change_detector::{detect, Detection, Direction, LiquidityChange};
pub use liquidity_watcher::{LiquidityWatcher, WatcherStatus};
pub use snapshot::{Snapshot, SnapshotStore};
