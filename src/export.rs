//! JSON renderings of reader results.
//!
//! Transaction dumps use the flat `{"<key>": "<value>"}` shape, where binary
//! values appear as their base64 text. The tagged variant spells out which
//! encoding each value uses.

use std::fs;
use std::path::{Path, PathBuf};

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::codec::DecodedValue;
use crate::error::ReaderResult;
use crate::facade::Filter;
use crate::types::{StateSummary, Statistics, TransactionSet};

pub fn transactions_to_json(transactions: &TransactionSet) -> ReaderResult<String> {
    Ok(serde_json::to_string(transactions)?)
}

/// `{"<key>": {"encoding": "utf8" | "base64", "data": "..."}}`
pub fn transactions_to_tagged_json(transactions: &TransactionSet) -> ReaderResult<String> {
    Ok(serde_json::to_string(&Tagged(transactions))?)
}

pub fn state_to_json(state: &StateSummary) -> ReaderResult<String> {
    Ok(serde_json::to_string(state)?)
}

pub fn statistics_to_json(statistics: &Statistics) -> ReaderResult<String> {
    Ok(serde_json::to_string(statistics)?)
}

/// Download name for a dump of `filter`'s results.
///
/// The search term is reduced to ASCII alphanumerics, `-`, `_` and `.`;
/// anything else becomes `_`, so the name is always a single path component.
pub fn export_file_name(filter: &Filter) -> String {
    match filter {
        Filter::All => "transactions.json".to_string(),
        Filter::Prefix(prefix) => format!("transactions_prefix_{}.json", file_safe(prefix)),
        Filter::Suffix(suffix) => format!("transactions_suffix_{}.json", file_safe(suffix)),
    }
}

fn file_safe(term: &str) -> String {
    term.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
            _ => '_',
        })
        .collect()
}

/// Writes the flat JSON dump into `dir` under [`export_file_name`] and
/// returns the written path.
pub fn write_transactions(
    dir: &Path,
    filter: &Filter,
    transactions: &TransactionSet,
) -> ReaderResult<PathBuf> {
    let path = dir.join(export_file_name(filter));
    fs::write(&path, transactions_to_json(transactions)?)?;
    tracing::debug!(path = ?path, entries = transactions.len(), "Exported transactions");
    Ok(path)
}

struct Tagged<'a>(&'a TransactionSet);

struct TaggedValue<'a>(&'a DecodedValue);

impl Serialize for Tagged<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0.iter() {
            map.serialize_entry(key, &TaggedValue(value))?;
        }
        map.end()
    }
}

impl Serialize for TaggedValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TaggedValue", 2)?;
        state.serialize_field("encoding", self.0.encoding())?;
        state.serialize_field("data", self.0.as_str())?;
        state.end()
    }
}
