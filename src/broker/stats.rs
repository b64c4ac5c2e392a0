use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lifetime delivery counters for the broker
#[derive(Debug, Default)]
pub struct BrokerStats {
    /// Tick rounds run by the coordinator
    ticks_published: AtomicU64,

    /// Position updates handed to a subscriber queue
    ticks_delivered: AtomicU64,

    /// Position updates dropped because a subscriber was too slow
    ticks_dropped: AtomicU64,

    /// Subscribers ever registered
    connections_total: AtomicU64,
}

impl BrokerStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_round(&self, delivered: usize, dropped: usize) {
        self.ticks_published.fetch_add(1, Ordering::Relaxed);
        self.ticks_delivered
            .fetch_add(delivered as u64, Ordering::Relaxed);
        self.ticks_dropped.fetch_add(dropped as u64, Ordering::Relaxed);
    }

    pub fn record_connection(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            ticks_published: self.ticks_published.load(Ordering::Relaxed),
            ticks_delivered: self.ticks_delivered.load(Ordering::Relaxed),
            ticks_dropped: self.ticks_dropped.load(Ordering::Relaxed),
            connections_total: self.connections_total.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of broker counters at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub ticks_published: u64,
    pub ticks_delivered: u64,
    pub ticks_dropped: u64,
    pub connections_total: u64,
}
