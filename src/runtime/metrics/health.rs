use serde::{Deserialize, Serialize};

use super::MetricsSnapshot;

/// Health status of a reader session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub state: HealthState,
    pub scans_performed: u64,
    pub failed_operations: u64,
    pub skipped_entries: u64,
    pub last_operation_secs: Option<u64>,
}

/// Health state enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthState {
    Healthy,
    Idle,
    Degraded,
    Unhealthy,
}

impl std::fmt::Display for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthState::Healthy => write!(f, "HEALTHY"),
            HealthState::Idle => write!(f, "IDLE"),
            HealthState::Degraded => write!(f, "DEGRADED"),
            HealthState::Unhealthy => write!(f, "UNHEALTHY"),
        }
    }
}

/// Whole-call failures make a session unhealthy; skipped entries only
/// degrade it.
pub(crate) fn derive_health(snapshot: &MetricsSnapshot) -> HealthStatus {
    let failed_operations = snapshot.scan_failures + snapshot.state_query_failures;
    let has_activity = snapshot.last_operation_secs.is_some();
    let is_responsive = snapshot
        .last_operation_secs
        .map(|secs| secs < 60)
        .unwrap_or(false);

    let state = if failed_operations > 0 {
        HealthState::Unhealthy
    } else if snapshot.entries_skipped > 0 {
        HealthState::Degraded
    } else if has_activity && is_responsive {
        HealthState::Healthy
    } else {
        HealthState::Idle
    };

    HealthStatus {
        state,
        scans_performed: snapshot.scans_performed,
        failed_operations,
        skipped_entries: snapshot.entries_skipped,
        last_operation_secs: snapshot.last_operation_secs,
    }
}
