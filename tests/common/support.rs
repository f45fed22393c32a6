#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use immudb_explorer::client::memory::DEFAULT_DATABASE;
use immudb_explorer::client::{
    ClientError, Credentials, MemoryClient, MemoryConnector, MemoryStore, PointValue, ScanItem,
    ScanRequest, ScanShape, StoreClient, StoreConnector, StoreState,
};
use immudb_explorer::{Endpoint, ImmuDbReader, ReaderConfig};

/// Faults injected by [`FlakyConnector`] sessions.
#[derive(Debug, Default)]
pub struct FaultPlan {
    pub fail_scans: bool,
    pub fail_state: bool,
    pub failing_lookups: HashSet<Vec<u8>>,
    pub ignore_prefix: bool,
}

/// Wraps [`MemoryConnector`] and lets tests break individual calls.
#[derive(Clone)]
pub struct FlakyConnector {
    inner: MemoryConnector,
    plan: Arc<Mutex<FaultPlan>>,
}

impl FlakyConnector {
    pub fn new(store: &MemoryStore) -> Self {
        Self {
            inner: store.connector(),
            plan: Arc::new(Mutex::new(FaultPlan::default())),
        }
    }

    pub fn plan(&self) -> std::sync::MutexGuard<'_, FaultPlan> {
        self.plan.lock().unwrap()
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.inner.set_reachable(reachable);
    }
}

pub struct FlakyClient {
    inner: MemoryClient,
    plan: Arc<Mutex<FaultPlan>>,
}

impl StoreConnector for FlakyConnector {
    type Client = FlakyClient;

    fn open(&self, endpoint: &Endpoint) -> Result<FlakyClient, ClientError> {
        Ok(FlakyClient {
            inner: self.inner.open(endpoint)?,
            plan: Arc::clone(&self.plan),
        })
    }
}

impl StoreClient for FlakyClient {
    fn login(&mut self, credentials: &Credentials) -> Result<(), ClientError> {
        self.inner.login(credentials)
    }

    fn use_database(&mut self, database: &str) -> Result<(), ClientError> {
        self.inner.use_database(database)
    }

    fn scan(&mut self, request: &ScanRequest) -> Result<Vec<ScanItem>, ClientError> {
        let ignore_prefix = {
            let plan = self.plan.lock().unwrap();
            if plan.fail_scans {
                return Err(ClientError::Rpc("injected scan failure".to_string()));
            }
            plan.ignore_prefix
        };
        if ignore_prefix {
            let widened = ScanRequest {
                prefix: Vec::new(),
                ..request.clone()
            };
            return self.inner.scan(&widened);
        }
        self.inner.scan(request)
    }

    fn get(&mut self, key: &[u8]) -> Result<PointValue, ClientError> {
        if self.plan.lock().unwrap().failing_lookups.contains(key) {
            return Err(ClientError::Rpc("injected lookup failure".to_string()));
        }
        self.inner.get(key)
    }

    fn current_state(&mut self) -> Result<StoreState, ClientError> {
        if self.plan.lock().unwrap().fail_state {
            return Err(ClientError::Rpc("injected state failure".to_string()));
        }
        self.inner.current_state()
    }
}

pub fn default_config() -> ReaderConfig {
    ReaderConfig::new("immudb://localhost:3322", DEFAULT_DATABASE)
}

/// Store with a mix of namespaces, a binary value and a binary key.
pub fn fixture_store(shape: ScanShape) -> MemoryStore {
    let store = MemoryStore::new().with_scan_shape(shape);
    let entries: &[(&[u8], &[u8])] = &[
        (b"block:1", b"abc"),
        (b"block:22", b"abcdef"),
        (b"block:309", b"{\"height\":309}"),
        (b"log:9", b"x"),
        (b"log:19", b"started"),
        (b"tx:0009", &[0xde, 0xad, 0xbe, 0xef]),
        (b"user:alice", b"admin"),
        (&[b'r', b'a', b'w', 0xff], b"binary-key"),
    ];
    for (key, value) in entries {
        store.set(DEFAULT_DATABASE, *key, *value).unwrap();
    }
    store
}

pub fn connect<K: StoreConnector>(connector: K) -> ImmuDbReader<K> {
    ImmuDbReader::connect(connector, default_config()).expect("connect to fixture store")
}
