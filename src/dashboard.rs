//! Data side of the explorer dashboard.
//!
//! A [`DashboardSession`] owns one reader together with the most recently
//! fetched transactions and their statistics. Every fetch recomputes both;
//! nothing is cached across calls beyond the last result.

use serde::Serialize;

use crate::client::StoreConnector;
use crate::codec::DecodedValue;
use crate::error::{ReaderError, ReaderResult};
use crate::facade::{Filter, ImmuDbReader, ReaderConfig, TransactionReader};
use crate::stats::summarize;
use crate::types::{PrefixCount, Report, StateSummary, Statistics, TransactionSet};

pub const DEFAULT_ROW_LIMIT: usize = 100;
pub const MIN_ROW_LIMIT: usize = 10;
pub const MAX_ROW_LIMIT: usize = 1000;

/// One row of a transaction listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub key: String,
    pub value: DecodedValue,
}

/// A bounded view over the latest fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    /// Number of transactions fetched, before the row limit.
    pub total: usize,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickStats {
    pub count: usize,
    pub avg_key_length: f64,
    pub avg_value_length: f64,
}

/// Sidebar summary: store state plus headline statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseInfo {
    pub state: StateSummary,
    pub quick_stats: QuickStats,
}

pub struct DashboardSession<R: TransactionReader> {
    reader: R,
    transactions: TransactionSet,
    statistics: Statistics,
    last_faults: Vec<ReaderError>,
}

impl<K: StoreConnector> DashboardSession<ImmuDbReader<K>> {
    /// Connects and performs the initial fetch.
    pub fn connect(connector: K, config: ReaderConfig) -> ReaderResult<Self> {
        let reader = ImmuDbReader::connect(connector, config)?;
        Ok(Self::new(reader))
    }
}

impl<R: TransactionReader> DashboardSession<R> {
    pub fn new(reader: R) -> Self {
        let mut session = Self {
            reader,
            transactions: TransactionSet::new(),
            statistics: Statistics::default(),
            last_faults: Vec::new(),
        };
        session.refresh();
        session
    }

    /// Re-reads every transaction and recomputes the statistics.
    pub fn refresh(&mut self) -> &Statistics {
        let report = self.reader.scan_all();
        self.absorb(report);
        &self.statistics
    }

    /// Refreshes, then lists at most `limit` rows (clamped to
    /// `MIN_ROW_LIMIT..=MAX_ROW_LIMIT`).
    pub fn fetch_all(&mut self, limit: usize) -> Listing {
        self.refresh();
        let limit = limit.clamp(MIN_ROW_LIMIT, MAX_ROW_LIMIT);
        Listing {
            total: self.transactions.len(),
            rows: self
                .transactions
                .iter()
                .take(limit)
                .map(|(key, value)| Row {
                    key: key.to_string(),
                    value: value.clone(),
                })
                .collect(),
        }
    }

    pub fn search_prefix(&mut self, prefix: &str) -> ReaderResult<Report<TransactionSet>> {
        if prefix.is_empty() {
            return Err(ReaderError::EmptySearchTerm { field: "prefix" });
        }
        Ok(self.reader.scan_prefix(prefix))
    }

    pub fn search_suffix(&mut self, suffix: &str) -> ReaderResult<Report<TransactionSet>> {
        if suffix.is_empty() {
            return Err(ReaderError::EmptySearchTerm { field: "suffix" });
        }
        Ok(self.reader.scan_suffix(suffix.as_bytes()))
    }

    /// Runs the search a filter describes.
    pub fn search(&mut self, filter: &Filter) -> ReaderResult<Report<TransactionSet>> {
        match filter {
            Filter::All => Ok(self.reader.scan_all()),
            Filter::Prefix(prefix) => self.search_prefix(prefix),
            Filter::Suffix(suffix) => self.search_suffix(suffix),
        }
    }

    /// Most common prefixes of the latest fetch, for one-click searches.
    pub fn quick_prefixes(&self) -> &[PrefixCount] {
        &self.statistics.common_prefixes
    }

    /// State summary plus headline statistics. A failed state query leaves
    /// the state fields unset and is listed in the report's faults.
    pub fn database_info(&mut self) -> Report<DatabaseInfo> {
        let quick_stats = QuickStats {
            count: self.statistics.count,
            avg_key_length: self.statistics.avg_key_length,
            avg_value_length: self.statistics.avg_value_length,
        };
        let report = self.reader.get_state();
        if !report.is_clean() {
            tracing::warn!(faults = report.faults.len(), "Database info is incomplete");
        }
        report.map(|state| DatabaseInfo { state, quick_stats })
    }

    pub fn transactions(&self) -> &TransactionSet {
        &self.transactions
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Faults recovered from during the latest fetch.
    pub fn last_faults(&self) -> &[ReaderError] {
        &self.last_faults
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    fn absorb(&mut self, report: Report<TransactionSet>) {
        self.statistics = summarize(&report.value);
        self.transactions = report.value;
        self.last_faults = report.faults;
    }
}
