//! Threshold-based change detection between two consecutive snapshots

use serde::Serialize;
use std::fmt;

use super::snapshot::Snapshot;

/// Which way the base reserve moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increase,
    Decrease,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Increase => write!(f, "increase"),
            Direction::Decrease => write!(f, "decrease"),
        }
    }
}

/// Details of a base reserve move that crossed the threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityChange {
    pub previous_base: f64,
    pub current_base: f64,
    pub current_quote: f64,
    /// Unsigned fraction, 0.06 means 6%
    pub relative_change: f64,
    pub direction: Direction,
}

impl LiquidityChange {
    /// Signed percentage, negative when liquidity left the pool
    pub fn signed_percent(&self) -> f64 {
        match self.direction {
            Direction::Increase => self.relative_change * 100.0,
            Direction::Decrease => -self.relative_change * 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    Alert(LiquidityChange),
    NoAlert,
}

impl Detection {
    pub fn is_alert(&self) -> bool {
        matches!(self, Detection::Alert(_))
    }
}

/// Compare the base reserve of two snapshots against `threshold`.
///
/// Returns `NoAlert` when either snapshot is missing or the previous base
/// reserve is zero. Only a change strictly greater than `threshold` alerts.
pub fn detect(previous: Option<&Snapshot>, current: Option<&Snapshot>, threshold: f64) -> Detection {
    let (previous, current) = match (previous, current) {
        (Some(p), Some(c)) => (p, c),
        _ => return Detection::NoAlert,
    };

    if previous.base_amount == 0.0 {
        return Detection::NoAlert;
    }

    let delta = current.base_amount - previous.base_amount;
    let relative_change = delta.abs() / previous.base_amount;

    if relative_change > threshold {
        Detection::Alert(LiquidityChange {
            previous_base: previous.base_amount,
            current_base: current.base_amount,
            current_quote: current.quote_amount,
            relative_change,
            direction: if delta < 0.0 {
                Direction::Decrease
            } else {
                Direction::Increase
            },
        })
    } else {
        Detection::NoAlert
    }
}
