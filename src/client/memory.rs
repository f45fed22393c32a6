//! In-process store used for tests, demos and offline exploration.
//!
//! Keeps one sorted map per database together with a transaction counter and
//! a chained transaction hash, which is enough to answer every call the
//! reader makes against a real server.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::facade::Endpoint;

use super::{
    ClientError, Credentials, KeyValueRecord, PointValue, ScanItem, ScanRequest, StoreClient,
    StoreConnector, StoreState,
};

pub const DEFAULT_DATABASE: &str = "defaultdb";

const TX_HASH_CONTEXT: &str = "immudb-explorer memory store 2024-05 tx hash v1";

/// Shape in which scans hand entries back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanShape {
    #[default]
    Pairs,
    Records,
    KeysOnly,
}

#[derive(Debug)]
struct Database {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
    tx_id: u64,
    tx_hash: [u8; 32],
}

impl Database {
    fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            tx_id: 0,
            tx_hash: [0u8; 32],
        }
    }

    fn commit(&mut self, key: Vec<u8>, value: Vec<u8>) -> u64 {
        let tx_id = self.tx_id + 1;
        let mut hasher = blake3::Hasher::new_derive_key(TX_HASH_CONTEXT);
        hasher.update(&self.tx_hash);
        hasher.update(&tx_id.to_le_bytes());
        hasher.update(&(key.len() as u64).to_le_bytes());
        hasher.update(&key);
        hasher.update(&value);
        self.tx_hash = *hasher.finalize().as_bytes();
        self.tx_id = tx_id;
        self.entries.insert(key, value);
        tx_id
    }

    fn scan(&self, request: &ScanRequest) -> Vec<(Vec<u8>, Vec<u8>)> {
        let matches = |key: &[u8]| -> bool {
            if !key.starts_with(&request.prefix) {
                return false;
            }
            if request.seek_key.is_empty() {
                return true;
            }
            if request.desc {
                key < request.seek_key.as_slice()
            } else {
                key > request.seek_key.as_slice()
            }
        };

        let limit = if request.limit == 0 {
            usize::MAX
        } else {
            request.limit
        };

        let selected: Box<dyn Iterator<Item = (&Vec<u8>, &Vec<u8>)> + '_> = if request.desc {
            Box::new(self.entries.iter().rev())
        } else {
            Box::new(self.entries.iter())
        };

        selected
            .filter(|(key, _)| matches(key.as_slice()))
            .take(limit)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

#[derive(Debug)]
struct StoreInner {
    credentials: Credentials,
    databases: HashMap<String, Database>,
    scan_shape: ScanShape,
}

/// Shared in-memory store. Clones refer to the same data.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl MemoryStore {
    /// Creates a store with a single empty `defaultdb` and default credentials.
    pub fn new() -> Self {
        let mut databases = HashMap::new();
        databases.insert(DEFAULT_DATABASE.to_string(), Database::new());
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                credentials: Credentials::default(),
                databases,
                scan_shape: ScanShape::default(),
            })),
        }
    }

    pub fn with_credentials(self, credentials: Credentials) -> Self {
        self.inner.write().credentials = credentials;
        self
    }

    pub fn with_scan_shape(self, shape: ScanShape) -> Self {
        self.set_scan_shape(shape);
        self
    }

    pub fn set_scan_shape(&self, shape: ScanShape) {
        self.inner.write().scan_shape = shape;
    }

    /// Creates `name` if it does not exist yet. Returns `true` when created.
    pub fn create_database(&self, name: impl Into<String>) -> bool {
        let mut inner = self.inner.write();
        let name = name.into();
        if inner.databases.contains_key(&name) {
            return false;
        }
        inner.databases.insert(name, Database::new());
        true
    }

    /// Writes `key = value` as a new transaction and returns its id.
    pub fn set(
        &self,
        database: &str,
        key: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
    ) -> Result<u64, ClientError> {
        let mut inner = self.inner.write();
        let db = inner
            .databases
            .get_mut(database)
            .ok_or_else(|| ClientError::DatabaseNotFound(database.to_string()))?;
        Ok(db.commit(key.into(), value.into()))
    }

    /// Number of live keys in `database`.
    pub fn len(&self, database: &str) -> usize {
        self.inner
            .read()
            .databases
            .get(database)
            .map(|db| db.entries.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self, database: &str) -> bool {
        self.len(database) == 0
    }

    pub fn connector(&self) -> MemoryConnector {
        MemoryConnector {
            store: self.clone(),
            reachable: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Opens [`MemoryClient`] sessions. Can be flipped unreachable to simulate an
/// endpoint that refuses connections.
#[derive(Debug, Clone)]
pub struct MemoryConnector {
    store: MemoryStore,
    reachable: Arc<AtomicBool>,
}

impl MemoryConnector {
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::Release);
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }
}

impl StoreConnector for MemoryConnector {
    type Client = MemoryClient;

    fn open(&self, endpoint: &Endpoint) -> Result<MemoryClient, ClientError> {
        if !self.reachable.load(Ordering::Acquire) {
            return Err(ClientError::Unreachable {
                address: endpoint.address(),
            });
        }
        Ok(MemoryClient {
            store: self.store.clone(),
            reachable: Arc::clone(&self.reachable),
            authenticated: false,
            database: None,
        })
    }
}

/// A session against a [`MemoryStore`].
#[derive(Debug)]
pub struct MemoryClient {
    store: MemoryStore,
    reachable: Arc<AtomicBool>,
    authenticated: bool,
    database: Option<String>,
}

impl MemoryClient {
    fn ensure_reachable(&self) -> Result<(), ClientError> {
        if self.reachable.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(ClientError::Rpc("connection reset by peer".to_string()))
        }
    }

    fn selected_database(&self) -> Result<&str, ClientError> {
        self.ensure_reachable()?;
        if !self.authenticated {
            return Err(ClientError::NotAuthenticated);
        }
        self.database
            .as_deref()
            .ok_or(ClientError::NoDatabaseSelected)
    }
}

impl StoreClient for MemoryClient {
    fn login(&mut self, credentials: &Credentials) -> Result<(), ClientError> {
        self.ensure_reachable()?;
        let expected = self.store.inner.read().credentials.token();
        if credentials.token() != expected {
            self.authenticated = false;
            return Err(ClientError::AuthenticationFailed {
                username: credentials.username.clone(),
            });
        }
        self.authenticated = true;
        Ok(())
    }

    fn use_database(&mut self, database: &str) -> Result<(), ClientError> {
        self.ensure_reachable()?;
        if !self.authenticated {
            return Err(ClientError::NotAuthenticated);
        }
        if !self.store.inner.read().databases.contains_key(database) {
            return Err(ClientError::DatabaseNotFound(database.to_string()));
        }
        self.database = Some(database.to_string());
        Ok(())
    }

    fn scan(&mut self, request: &ScanRequest) -> Result<Vec<ScanItem>, ClientError> {
        let database = self.selected_database()?;
        let inner = self.store.inner.read();
        let db = inner
            .databases
            .get(database)
            .ok_or_else(|| ClientError::DatabaseNotFound(database.to_string()))?;

        let shape = inner.scan_shape;
        let items = db
            .scan(request)
            .into_iter()
            .map(|(key, value)| match shape {
                ScanShape::Pairs => ScanItem::Pair(key, value),
                ScanShape::Records => ScanItem::record(KeyValueRecord::new(key, value)),
                ScanShape::KeysOnly => ScanItem::Key(key),
            })
            .collect();
        Ok(items)
    }

    fn get(&mut self, key: &[u8]) -> Result<PointValue, ClientError> {
        let database = self.selected_database()?;
        let inner = self.store.inner.read();
        inner
            .databases
            .get(database)
            .and_then(|db| db.entries.get(key))
            .map(|value| PointValue::value(value.clone()))
            .ok_or_else(|| ClientError::KeyNotFound {
                key: String::from_utf8_lossy(key).into_owned(),
            })
    }

    fn current_state(&mut self) -> Result<StoreState, ClientError> {
        let database = self.selected_database()?;
        let inner = self.store.inner.read();
        let db = inner
            .databases
            .get(database)
            .ok_or_else(|| ClientError::DatabaseNotFound(database.to_string()))?;
        Ok(StoreState {
            database: database.to_string(),
            tx_id: db.tx_id,
            tx_hash: db.tx_hash.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> Endpoint {
        Endpoint::parse("localhost").unwrap()
    }

    fn logged_in(store: &MemoryStore) -> MemoryClient {
        let mut client = store.connector().open(&endpoint()).unwrap();
        client.login(&Credentials::default()).unwrap();
        client.use_database(DEFAULT_DATABASE).unwrap();
        client
    }

    fn keys(items: &[ScanItem]) -> Vec<Vec<u8>> {
        items
            .iter()
            .map(|item| item.raw_key().unwrap().to_vec())
            .collect()
    }

    #[test]
    fn commits_advance_tx_id_and_hash() {
        let store = MemoryStore::new();
        let mut client = logged_in(&store);
        let genesis = client.current_state().unwrap();
        assert_eq!(genesis.tx_id, 0);
        assert_eq!(genesis.tx_hash, vec![0u8; 32]);

        assert_eq!(store.set(DEFAULT_DATABASE, "a", "1").unwrap(), 1);
        let first = client.current_state().unwrap();
        assert_eq!(store.set(DEFAULT_DATABASE, "a", "2").unwrap(), 2);
        let second = client.current_state().unwrap();

        assert_eq!(first.tx_id, 1);
        assert_eq!(second.tx_id, 2);
        assert_ne!(first.tx_hash, genesis.tx_hash);
        assert_ne!(first.tx_hash, second.tx_hash);
        assert_eq!(store.len(DEFAULT_DATABASE), 1);
    }

    #[test]
    fn tx_hash_is_deterministic() {
        let left = MemoryStore::new();
        let right = MemoryStore::new();
        for store in [&left, &right] {
            store.set(DEFAULT_DATABASE, "k1", "v1").unwrap();
            store.set(DEFAULT_DATABASE, "k2", "v2").unwrap();
        }
        let left_state = logged_in(&left).current_state().unwrap();
        let right_state = logged_in(&right).current_state().unwrap();
        assert_eq!(left_state, right_state);
    }

    #[test]
    fn scan_honours_prefix_seek_limit_and_order() {
        let store = MemoryStore::new();
        for key in ["a:1", "a:2", "a:3", "b:1"] {
            store.set(DEFAULT_DATABASE, key, "x").unwrap();
        }
        let mut client = logged_in(&store);

        let prefixed = client.scan(&ScanRequest::with_prefix("a:")).unwrap();
        assert_eq!(keys(&prefixed), vec![b"a:1".to_vec(), b"a:2".to_vec(), b"a:3".to_vec()]);

        let sought = client
            .scan(&ScanRequest::all().with_seek_key("a:1").with_limit(2))
            .unwrap();
        assert_eq!(keys(&sought), vec![b"a:2".to_vec(), b"a:3".to_vec()]);

        let reversed = client.scan(&ScanRequest::all().descending()).unwrap();
        assert_eq!(keys(&reversed)[0], b"b:1".to_vec());
    }

    #[test]
    fn scan_shape_controls_item_variant() {
        let store = MemoryStore::new().with_scan_shape(ScanShape::KeysOnly);
        store.set(DEFAULT_DATABASE, "k", "v").unwrap();
        let mut client = logged_in(&store);
        let items = client.scan(&ScanRequest::all()).unwrap();
        assert!(matches!(items.as_slice(), [ScanItem::Key(key)] if key == b"k"));

        store.set_scan_shape(ScanShape::Records);
        let items = client.scan(&ScanRequest::all()).unwrap();
        match items.as_slice() {
            [ScanItem::Record(record)] => {
                assert_eq!(record.key(), Some(&b"k"[..]));
                assert_eq!(record.value(), Some(&b"v"[..]));
            }
            other => panic!("unexpected items: {other:?}"),
        }
    }

    #[test]
    fn rejects_wrong_credentials_and_unknown_database() {
        let store = MemoryStore::new();
        let mut client = store.connector().open(&endpoint()).unwrap();
        let err = client
            .login(&Credentials::new("immudb", "wrong"))
            .unwrap_err();
        assert!(matches!(err, ClientError::AuthenticationFailed { .. }));
        assert!(matches!(
            client.use_database(DEFAULT_DATABASE),
            Err(ClientError::NotAuthenticated)
        ));

        client.login(&Credentials::default()).unwrap();
        assert!(matches!(
            client.use_database("missing"),
            Err(ClientError::DatabaseNotFound(name)) if name == "missing"
        ));
        assert!(matches!(
            client.scan(&ScanRequest::all()),
            Err(ClientError::NoDatabaseSelected)
        ));
    }

    #[test]
    fn unreachable_connector_refuses_sessions() {
        let store = MemoryStore::new();
        let connector = store.connector();
        let mut client = logged_in(&store);
        connector.set_reachable(false);

        let err = connector.open(&endpoint()).unwrap_err();
        assert!(matches!(err, ClientError::Unreachable { address } if address == "localhost:3322"));

        // Sessions opened from a different connector are unaffected.
        assert!(client.current_state().is_ok());
    }

    #[test]
    fn get_missing_key_is_an_error() {
        let store = MemoryStore::new();
        let mut client = logged_in(&store);
        assert!(matches!(
            client.get(b"nope"),
            Err(ClientError::KeyNotFound { key }) if key == "nope"
        ));
    }
}
