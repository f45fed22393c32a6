use std::time::Instant;

use crate::client::{ScanItem, ScanRequest, StoreClient, StoreConnector};
use crate::codec::decode_entry;
use crate::error::{ReaderError, ReaderResult};
use crate::metrics::ReaderMetrics;
use crate::types::{Report, StateSummary, TransactionSet};

use super::config::{Endpoint, ReaderConfig};
use super::normalize::normalize;
use super::TransactionReader;

/// Session against one database of the store.
///
/// Holds the connector so that [`ImmuDbReader::reconnect`] can replace the
/// live client. Every remote call takes `&mut self`; use one reader per
/// caller when scans have to run in parallel.
pub struct ImmuDbReader<K: StoreConnector> {
    connector: K,
    client: K::Client,
    config: ReaderConfig,
    endpoint: Endpoint,
    metrics: ReaderMetrics,
}

impl<K: StoreConnector> ImmuDbReader<K> {
    /// Opens a session: connect, log in and select the configured database.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEndpoint` if the endpoint string cannot be parsed and
    /// `Connection` if the store cannot be reached, rejects the credentials,
    /// or does not know the database.
    ///
    /// # Examples
    ///
    /// ```
    /// use immudb_explorer::client::MemoryStore;
    /// use immudb_explorer::facade::{ImmuDbReader, ReaderConfig, TransactionReader};
    ///
    /// let store = MemoryStore::new();
    /// store.set("defaultdb", "block:1", "abc").unwrap();
    ///
    /// let config = ReaderConfig::new("localhost:3322", "defaultdb");
    /// let mut reader = ImmuDbReader::connect(store.connector(), config).unwrap();
    /// let report = reader.scan_all();
    /// assert!(report.is_clean());
    /// assert_eq!(report.value.len(), 1);
    /// ```
    pub fn connect(connector: K, config: ReaderConfig) -> ReaderResult<Self> {
        let endpoint = config.parsed_endpoint()?;
        let client = open_session(&connector, &endpoint, &config)?;

        tracing::info!(
            address = %endpoint.address(),
            database = %config.database,
            "Connected to store"
        );

        Ok(Self {
            connector,
            client,
            config,
            endpoint,
            metrics: ReaderMetrics::new(),
        })
    }

    /// Replaces the current session with a freshly opened one.
    ///
    /// On failure the previous session is kept.
    pub fn reconnect(&mut self) -> ReaderResult<()> {
        let client = open_session(&self.connector, &self.endpoint, &self.config)?;
        self.client = client;
        self.metrics.record_reconnect();
        tracing::info!(
            address = %self.endpoint.address(),
            database = %self.config.database,
            "Reconnected to store"
        );
        Ok(())
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn metrics(&self) -> &ReaderMetrics {
        &self.metrics
    }

    fn base_request(&self) -> ScanRequest {
        ScanRequest::all().with_limit(self.config.scan_limit)
    }

    /// Runs one scan call and decodes what survives both filters.
    ///
    /// `keep_raw` sees the raw key bytes before any lookup or decoding;
    /// `keep_decoded` sees the decoded key.
    fn collect(
        &mut self,
        request: ScanRequest,
        keep_raw: impl Fn(&[u8]) -> bool,
        keep_decoded: impl Fn(&str) -> bool,
    ) -> Report<TransactionSet> {
        let started = Instant::now();
        let items = match self.client.scan(&request) {
            Ok(items) => items,
            Err(source) => {
                tracing::error!(
                    database = %self.config.database,
                    prefix = %String::from_utf8_lossy(&request.prefix),
                    error = %source,
                    "Scan call failed"
                );
                self.metrics.record_scan_failure();
                return Report {
                    value: TransactionSet::new(),
                    faults: vec![ReaderError::Scan { source }],
                };
            }
        };

        let mut transactions = TransactionSet::new();
        let mut faults = Vec::new();
        for item in items {
            if let Some(raw_key) = item.raw_key() {
                if !keep_raw(raw_key) {
                    continue;
                }
            }
            if matches!(item, ScanItem::Key(_)) {
                self.metrics.record_lookup();
            }

            let entry = match normalize(&mut self.client, item) {
                Ok(entry) => entry,
                Err(fault) => {
                    tracing::warn!(error = %fault, "Skipping entry");
                    faults.push(fault);
                    continue;
                }
            };
            if !keep_raw(&entry.key) {
                continue;
            }

            let (key, value) = decode_entry(entry);
            if keep_decoded(&key) {
                transactions.insert(key, value);
            }
        }

        self.metrics
            .record_scan(transactions.len(), faults.len(), started.elapsed());
        tracing::debug!(
            entries = transactions.len(),
            skipped = faults.len(),
            "Scan completed"
        );

        Report {
            value: transactions,
            faults,
        }
    }
}

impl<K: StoreConnector> TransactionReader for ImmuDbReader<K> {
    fn scan_all(&mut self) -> Report<TransactionSet> {
        let request = self.base_request();
        self.collect(request, |_| true, |_| true)
    }

    fn scan_prefix(&mut self, prefix: &str) -> Report<TransactionSet> {
        let mut request = self.base_request();
        request.prefix = prefix.as_bytes().to_vec();
        self.collect(request, |_| true, |key| key.starts_with(prefix))
    }

    fn scan_suffix(&mut self, suffix: &[u8]) -> Report<TransactionSet> {
        let request = self.base_request();
        self.collect(request, |raw| raw.ends_with(suffix), |_| true)
    }

    fn get_state(&mut self) -> Report<StateSummary> {
        match self.client.current_state() {
            Ok(state) => {
                self.metrics.record_state_query(true);
                Report::clean(StateSummary::from(&state))
            }
            Err(source) => {
                self.metrics.record_state_query(false);
                tracing::warn!(
                    database = %self.config.database,
                    error = %source,
                    "State query failed"
                );
                Report {
                    value: StateSummary::unavailable(),
                    faults: vec![ReaderError::StateQuery { source }],
                }
            }
        }
    }
}

fn open_session<K: StoreConnector>(
    connector: &K,
    endpoint: &Endpoint,
    config: &ReaderConfig,
) -> ReaderResult<K::Client> {
    let fail = |source| ReaderError::Connection {
        address: endpoint.address(),
        database: config.database.clone(),
        source,
    };

    let mut client = connector.open(endpoint).map_err(fail)?;
    client.login(&config.credentials).map_err(fail)?;
    client.use_database(&config.database).map_err(fail)?;
    Ok(client)
}
