//! Runtime support: metrics collection and health derivation.

pub mod metrics;

pub mod prelude {
    pub use super::metrics::{HealthState, HealthStatus, MetricsSnapshot, ReaderMetrics};
}
