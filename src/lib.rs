//! # immudb-explorer
//!
//! Read-side tooling for immutable key-value stores.
//!
//! ## Features
//!
//! - **Scans**: whole-database, prefix and suffix reads, tolerant of the
//!   different entry shapes store clients hand back
//! - **State summaries**: current transaction id and root hash
//! - **Statistics**: entry counts, average key/value lengths, largest value
//!   and most common key prefixes
//! - **Dashboard session**: connect, refresh, bounded listings, searches and
//!   JSON export
//!
//! ## Quick Start
//!
//! ```
//! use immudb_explorer::client::MemoryStore;
//! use immudb_explorer::stats::summarize;
//! use immudb_explorer::{ImmuDbReader, ReaderConfig, TransactionReader};
//!
//! let store = MemoryStore::new();
//! store.set("defaultdb", "block:1", "abc")?;
//! store.set("defaultdb", "log:9", "x")?;
//!
//! let config = ReaderConfig::new("localhost:3322", "defaultdb");
//! let mut reader = ImmuDbReader::connect(store.connector(), config)?;
//!
//! let blocks = reader.scan_prefix("block:").into_value();
//! assert_eq!(blocks.len(), 1);
//!
//! let stats = summarize(&reader.scan_all().into_value());
//! assert_eq!(stats.count, 2);
//!
//! let state = reader.get_state().into_value();
//! assert_eq!(state.tx_id, Some(2));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Scans and state queries never fail outright: faults are collected in the
//! returned [`Report`] and the value degrades to a partial or empty result.
//! Only establishing a session can fail.

pub mod api;
pub mod client;
pub mod codec;
pub mod dashboard;
pub mod export;
pub mod runtime;
pub mod stats;

pub use crate::api::{error, facade, types};
pub use crate::runtime::metrics;

pub use api::error::{ReaderError, ReaderResult};
pub use api::facade::{Endpoint, Filter, ImmuDbReader, ReaderConfig, TransactionReader};
pub use api::types::*;
pub use client::{
    ClientError, Credentials, MemoryConnector, MemoryStore, ScanItem, ScanRequest, StoreClient,
    StoreConnector, StoreState,
};
pub use codec::DecodedValue;
pub use dashboard::{DashboardSession, DatabaseInfo, Listing};
pub use runtime::metrics::{HealthState, HealthStatus, MetricsSnapshot, ReaderMetrics};
pub use stats::summarize;
