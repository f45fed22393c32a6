use thiserror::Error;

use crate::client::ClientError;

pub type ReaderResult<T> = Result<T, ReaderError>;

/// Errors surfaced by the reader.
///
/// Scan, entry and state variants describe faults that were recovered from;
/// they travel in a [`Report`](crate::types::Report) rather than as `Err`.
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        endpoint: String,
        reason: &'static str,
    },

    #[error("failed to connect to {address} (database '{database}'): {source}")]
    Connection {
        address: String,
        database: String,
        #[source]
        source: ClientError,
    },

    #[error("scan failed: {source}")]
    Scan {
        #[source]
        source: ClientError,
    },

    #[error("skipped entry {key}: {reason}")]
    EntryDecode { key: String, reason: String },

    #[error("state query failed: {source}")]
    StateQuery {
        #[source]
        source: ClientError,
    },

    #[error("{field} must not be empty")]
    EmptySearchTerm { field: &'static str },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReaderError {
    pub(crate) fn entry(key: &[u8], reason: impl Into<String>) -> Self {
        ReaderError::EntryDecode {
            key: String::from_utf8_lossy(key).into_owned(),
            reason: reason.into(),
        }
    }
}
