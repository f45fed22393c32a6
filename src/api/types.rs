use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::client::StoreState;
use crate::codec::{to_hex, DecodedValue};
use crate::error::ReaderError;

/// Raw key/value pair as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl Entry {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Decoded entries keyed by decoded key.
///
/// Keys are unique. Iteration follows discovery order; re-inserting an
/// existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionSet {
    entries: Vec<(String, DecodedValue)>,
    index: HashMap<String, usize>,
}

impl TransactionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from text pairs, mostly useful in tests and fixtures.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<DecodedValue>,
    {
        pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect()
    }

    /// Inserts or replaces `key`, returning the previous value if any.
    pub fn insert(&mut self, key: String, value: DecodedValue) -> Option<DecodedValue> {
        match self.index.get(&key) {
            Some(&slot) => Some(std::mem::replace(&mut self.entries[slot].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&DecodedValue> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DecodedValue)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &DecodedValue> {
        self.entries.iter().map(|(_, value)| value)
    }
}

impl FromIterator<(String, DecodedValue)> for TransactionSet {
    fn from_iter<T: IntoIterator<Item = (String, DecodedValue)>>(iter: T) -> Self {
        let mut set = TransactionSet::new();
        for (key, value) in iter {
            set.insert(key, value);
        }
        set
    }
}

impl Serialize for TransactionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Sequence number and root hash of the store. Both fields are `None` when the
/// state could not be queried.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSummary {
    #[serde(rename = "txId")]
    pub tx_id: Option<u64>,
    #[serde(rename = "merkleRoot")]
    pub merkle_root: Option<String>,
}

impl StateSummary {
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn is_available(&self) -> bool {
        self.tx_id.is_some() && self.merkle_root.is_some()
    }
}

impl From<&StoreState> for StateSummary {
    fn from(state: &StoreState) -> Self {
        Self {
            tx_id: Some(state.tx_id),
            merkle_root: Some(to_hex(&state.tx_hash)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LargestValue {
    pub key: String,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixCount {
    pub prefix: String,
    pub count: usize,
}

/// Descriptive statistics over one [`TransactionSet`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub count: usize,
    pub avg_key_length: f64,
    pub avg_value_length: f64,
    pub largest_value: LargestValue,
    pub common_prefixes: Vec<PrefixCount>,
}

/// Result of an operation that recovers from faults instead of failing.
///
/// `value` is always usable (possibly partial or empty); `faults` lists what
/// was skipped or degraded along the way.
#[derive(Debug)]
pub struct Report<T> {
    pub value: T,
    pub faults: Vec<ReaderError>,
}

impl<T> Report<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            faults: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Report<U> {
        Report {
            value: f(self.value),
            faults: self.faults,
        }
    }
}
