//! Boundary to the remote key-value store.
//!
//! The reader never speaks a wire protocol itself. It talks to a
//! [`StoreClient`] obtained from a [`StoreConnector`], and everything below
//! that seam (login, database selection, scans, point reads, state queries)
//! belongs to the client implementation. [`MemoryStore`] is the in-process
//! implementation shipped with the crate.

use std::fmt;

use crate::facade::Endpoint;

mod auth;
pub mod memory;

pub use auth::Credentials;
pub use memory::{MemoryClient, MemoryConnector, MemoryStore, ScanShape};

/// Parameters of a single scan call.
///
/// A `limit` of zero means no limit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanRequest {
    pub seek_key: Vec<u8>,
    pub prefix: Vec<u8>,
    pub limit: usize,
    pub desc: bool,
}

impl ScanRequest {
    /// Requests every entry in the selected database.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<Vec<u8>>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_seek_key(mut self, seek_key: impl Into<Vec<u8>>) -> Self {
        self.seek_key = seek_key.into();
        self
    }

    pub fn descending(mut self) -> Self {
        self.desc = true;
        self
    }
}

/// Accessor view over a record returned by a scan.
///
/// Either side may be missing depending on how the client materialised the
/// record.
pub trait EntryFields: Send {
    fn key(&self) -> Option<&[u8]>;
    fn value(&self) -> Option<&[u8]>;
}

/// Plain owned record used by clients that return accessor-shaped entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyValueRecord {
    pub key: Option<Vec<u8>>,
    pub value: Option<Vec<u8>>,
}

impl KeyValueRecord {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: Some(key.into()),
            value: Some(value.into()),
        }
    }
}

impl EntryFields for KeyValueRecord {
    fn key(&self) -> Option<&[u8]> {
        self.key.as_deref()
    }

    fn value(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }
}

/// One item yielded by a scan.
///
/// Client versions disagree on what a scan returns, so every known shape is
/// represented and the reader normalizes them.
pub enum ScanItem {
    /// A direct `(key, value)` pair.
    Pair(Vec<u8>, Vec<u8>),
    /// An object exposing key and value accessors.
    Record(Box<dyn EntryFields>),
    /// A bare key; the value needs a follow-up point read.
    Key(Vec<u8>),
    /// Anything else. Carries a short description for diagnostics.
    Unrecognized(String),
}

impl ScanItem {
    pub fn record(record: impl EntryFields + 'static) -> Self {
        ScanItem::Record(Box::new(record))
    }

    /// Raw key bytes, when the shape carries them without a lookup.
    pub fn raw_key(&self) -> Option<&[u8]> {
        match self {
            ScanItem::Pair(key, _) | ScanItem::Key(key) => Some(key.as_slice()),
            ScanItem::Record(record) => record.key(),
            ScanItem::Unrecognized(_) => None,
        }
    }
}

impl fmt::Debug for ScanItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanItem::Pair(key, value) => f
                .debug_tuple("Pair")
                .field(&String::from_utf8_lossy(key))
                .field(&value.len())
                .finish(),
            ScanItem::Record(record) => f
                .debug_struct("Record")
                .field("key", &record.key().map(String::from_utf8_lossy))
                .field("value_len", &record.value().map(<[u8]>::len))
                .finish(),
            ScanItem::Key(key) => f
                .debug_tuple("Key")
                .field(&String::from_utf8_lossy(key))
                .finish(),
            ScanItem::Unrecognized(description) => {
                f.debug_tuple("Unrecognized").field(description).finish()
            }
        }
    }
}

/// Response of a point read.
///
/// Depending on the client the bytes arrive as `value` or as `payload`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PointValue {
    pub value: Option<Vec<u8>>,
    pub payload: Option<Vec<u8>>,
}

impl PointValue {
    pub fn value(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            value: Some(bytes.into()),
            payload: None,
        }
    }

    pub fn payload(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            value: None,
            payload: Some(bytes.into()),
        }
    }

    /// Resolves the value bytes: `value`, then `payload`, then empty.
    pub fn into_bytes(self) -> Vec<u8> {
        self.value.or(self.payload).unwrap_or_default()
    }
}

/// Current verifiable state of a database as reported by the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreState {
    pub database: String,
    pub tx_id: u64,
    pub tx_hash: Vec<u8>,
}

/// A logged-in session against the store.
pub trait StoreClient {
    fn login(&mut self, credentials: &Credentials) -> Result<(), ClientError>;

    fn use_database(&mut self, database: &str) -> Result<(), ClientError>;

    fn scan(&mut self, request: &ScanRequest) -> Result<Vec<ScanItem>, ClientError>;

    fn get(&mut self, key: &[u8]) -> Result<PointValue, ClientError>;

    fn current_state(&mut self) -> Result<StoreState, ClientError>;
}

/// Opens client sessions for an endpoint.
pub trait StoreConnector {
    type Client: StoreClient;

    fn open(&self, endpoint: &Endpoint) -> Result<Self::Client, ClientError>;
}

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("store unreachable at {address}")]
    Unreachable { address: String },
    #[error("authentication rejected for user '{username}'")]
    AuthenticationFailed { username: String },
    #[error("database '{0}' does not exist")]
    DatabaseNotFound(String),
    #[error("session is not authenticated")]
    NotAuthenticated,
    #[error("no database selected")]
    NoDatabaseSelected,
    #[error("key not found: {key}")]
    KeyNotFound { key: String },
    #[error("rpc failure: {0}")]
    Rpc(String),
}
