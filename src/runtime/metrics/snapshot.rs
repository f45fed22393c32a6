use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// A snapshot of reader metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub scans_performed: u64,
    pub scan_failures: u64,
    pub entries_decoded: u64,
    pub entries_skipped: u64,
    pub lookups_performed: u64,
    pub state_queries: u64,
    pub state_query_failures: u64,
    pub reconnects: u64,
    pub avg_scan_time_us: u64,
    pub scan_p50_us: u64,
    pub scan_p95_us: u64,
    pub scan_p99_us: u64,
    pub last_operation_secs: Option<u64>,
}

pub(crate) fn calculate_percentile(values: &VecDeque<u64>, percentile: u8) -> u64 {
    if values.is_empty() {
        return 0;
    }

    let mut sorted: Vec<_> = values.iter().copied().collect();
    sorted.sort_unstable();

    let index = ((percentile as f64 / 100.0) * (sorted.len() as f64 - 1.0)).round() as usize;
    sorted[index.min(sorted.len() - 1)]
}
