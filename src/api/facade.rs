//! Reader session and the operations it exposes.

mod config;
mod core;
mod normalize;


use crate::types::{Report, StateSummary, TransactionSet};

pub use self::core::ImmuDbReader;
pub use config::{Endpoint, ReaderConfig, DEFAULT_PORT};

/// Read operations over one database of the store.
///
/// None of these return `Err`: a failed scan yields an empty set, a failed
/// state query yields a summary with both fields unset, and entries that
/// cannot be read are skipped. Every such fault is listed in the returned
/// [`Report`].
pub trait TransactionReader {
    /// Every entry of the database.
    fn scan_all(&mut self) -> Report<TransactionSet>;

    /// Entries whose decoded key starts with `prefix`.
    ///
    /// The restriction is pushed to the store and checked again locally, so a
    /// store that ignores it still yields only matching keys.
    fn scan_prefix(&mut self, prefix: &str) -> Report<TransactionSet>;

    /// Entries whose raw key bytes end with `suffix`.
    ///
    /// The store has no suffix index, so this scans everything and filters
    /// on the raw bytes before decoding.
    fn scan_suffix(&mut self, suffix: &[u8]) -> Report<TransactionSet>;

    /// Current transaction id and root hash.
    fn get_state(&mut self) -> Report<StateSummary>;

    /// Dispatches on `filter`.
    fn read_transactions(&mut self, filter: &Filter) -> Report<TransactionSet> {
        match filter {
            Filter::All => self.scan_all(),
            Filter::Prefix(prefix) => self.scan_prefix(prefix),
            Filter::Suffix(suffix) => self.scan_suffix(suffix.as_bytes()),
        }
    }
}

/// Key filter applied to a read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Prefix(String),
    Suffix(String),
}

impl Filter {
    /// Builds a filter from optional search terms.
    ///
    /// Empty terms count as absent and a prefix wins over a suffix.
    pub fn from_terms(prefix: Option<&str>, suffix: Option<&str>) -> Self {
        match (prefix, suffix) {
            (Some(prefix), _) if !prefix.is_empty() => Filter::Prefix(prefix.to_string()),
            (_, Some(suffix)) if !suffix.is_empty() => Filter::Suffix(suffix.to_string()),
            _ => Filter::All,
        }
    }
}
