//! Metrics and observability for the reader.
//!
//! Counts scans, decoded and skipped entries, point lookups and state queries
//! so callers can tell a clean session from one that keeps degrading.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

pub mod health;
pub mod snapshot;

pub use health::{HealthState, HealthStatus};
pub use snapshot::MetricsSnapshot;

const RECENT_WINDOW: usize = 100;

/// Reader-side metrics collected at runtime.
///
/// Cloning shares the underlying counters. All counters are monotonically
/// increasing.
#[derive(Debug, Clone)]
pub struct ReaderMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    scans_performed: AtomicU64,
    scan_failures: AtomicU64,
    entries_decoded: AtomicU64,
    entries_skipped: AtomicU64,
    lookups_performed: AtomicU64,
    state_queries: AtomicU64,
    state_query_failures: AtomicU64,
    reconnects: AtomicU64,
    total_scan_time_us: AtomicU64,
    recent_operations: RwLock<RecentOperations>,
}

#[derive(Debug, Default)]
struct RecentOperations {
    last_100_scan_times_us: VecDeque<u64>,
    last_operation_timestamp: Option<Instant>,
}

impl RecentOperations {
    fn touch(&mut self) {
        self.last_operation_timestamp = Some(Instant::now());
    }
}

impl ReaderMetrics {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner::default()),
        }
    }

    pub fn record_scan(&self, decoded: usize, skipped: usize, duration: Duration) {
        self.inner.scans_performed.fetch_add(1, Ordering::Relaxed);
        self.inner
            .entries_decoded
            .fetch_add(decoded as u64, Ordering::Relaxed);
        self.inner
            .entries_skipped
            .fetch_add(skipped as u64, Ordering::Relaxed);

        let duration_us = duration.as_micros() as u64;
        self.inner
            .total_scan_time_us
            .fetch_add(duration_us, Ordering::Relaxed);

        let mut recent = self.inner.recent_operations.write();
        recent.touch();
        if recent.last_100_scan_times_us.len() >= RECENT_WINDOW {
            recent.last_100_scan_times_us.pop_front();
        }
        recent.last_100_scan_times_us.push_back(duration_us);
    }

    pub fn record_scan_failure(&self) {
        self.inner.scan_failures.fetch_add(1, Ordering::Relaxed);
        self.inner.recent_operations.write().touch();
    }

    pub fn record_lookup(&self) {
        self.inner.lookups_performed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_state_query(&self, succeeded: bool) {
        self.inner.state_queries.fetch_add(1, Ordering::Relaxed);
        if !succeeded {
            self.inner
                .state_query_failures
                .fetch_add(1, Ordering::Relaxed);
        }
        self.inner.recent_operations.write().touch();
    }

    pub fn record_reconnect(&self) {
        self.inner.reconnects.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let scans_performed = self.inner.scans_performed.load(Ordering::Relaxed);
        let total_scan_time_us = self.inner.total_scan_time_us.load(Ordering::Relaxed);

        let avg_scan_time_us = if scans_performed > 0 {
            total_scan_time_us / scans_performed
        } else {
            0
        };

        let recent = self.inner.recent_operations.read();
        let scan_p50 = snapshot::calculate_percentile(&recent.last_100_scan_times_us, 50);
        let scan_p95 = snapshot::calculate_percentile(&recent.last_100_scan_times_us, 95);
        let scan_p99 = snapshot::calculate_percentile(&recent.last_100_scan_times_us, 99);
        let last_operation_secs = recent
            .last_operation_timestamp
            .map(|t| t.elapsed().as_secs());
        drop(recent);

        MetricsSnapshot {
            scans_performed,
            scan_failures: self.inner.scan_failures.load(Ordering::Relaxed),
            entries_decoded: self.inner.entries_decoded.load(Ordering::Relaxed),
            entries_skipped: self.inner.entries_skipped.load(Ordering::Relaxed),
            lookups_performed: self.inner.lookups_performed.load(Ordering::Relaxed),
            state_queries: self.inner.state_queries.load(Ordering::Relaxed),
            state_query_failures: self.inner.state_query_failures.load(Ordering::Relaxed),
            reconnects: self.inner.reconnects.load(Ordering::Relaxed),
            avg_scan_time_us,
            scan_p50_us: scan_p50,
            scan_p95_us: scan_p95,
            scan_p99_us: scan_p99,
            last_operation_secs,
        }
    }

    pub fn health(&self) -> HealthStatus {
        health::derive_health(&self.snapshot())
    }
}

impl Default for ReaderMetrics {
    fn default() -> Self {
        Self::new()
    }
}
