//! Descriptive statistics over a [`TransactionSet`].
//!
//! Pure functions; nothing here touches the store.

use std::collections::HashMap;

use crate::types::{LargestValue, PrefixCount, Statistics, TransactionSet};

/// Longest prefix, in characters, counted for each key.
pub const MAX_PREFIX_CHARS: usize = 4;

/// Number of prefixes reported in [`Statistics::common_prefixes`].
pub const TOP_PREFIXES: usize = 5;

/// Computes [`Statistics`] for `transactions`.
///
/// Lengths are character counts of the decoded strings. The largest value is
/// the first entry whose length strictly exceeds every earlier one. Prefixes
/// are ranked by frequency with ties left in discovery order.
///
/// # Examples
///
/// ```
/// use immudb_explorer::stats::summarize;
/// use immudb_explorer::types::TransactionSet;
///
/// let set = TransactionSet::from_pairs([
///     ("block:1", "abc"),
///     ("block:22", "abcdef"),
///     ("log:9", "x"),
/// ]);
/// let stats = summarize(&set);
/// assert_eq!(stats.count, 3);
/// assert_eq!(stats.largest_value.key, "block:22");
/// assert_eq!(stats.largest_value.size, 6);
/// ```
pub fn summarize(transactions: &TransactionSet) -> Statistics {
    if transactions.is_empty() {
        return Statistics::default();
    }

    let mut key_chars = 0usize;
    let mut value_chars = 0usize;
    let mut largest = LargestValue::default();
    let mut prefixes = PrefixTally::default();

    for (key, value) in transactions.iter() {
        let value_len = value.char_len();
        key_chars += key.chars().count();
        value_chars += value_len;

        if value_len > largest.size {
            largest = LargestValue {
                key: key.to_string(),
                size: value_len,
            };
        }

        for prefix in prefix_candidates(key) {
            prefixes.observe(prefix);
        }
    }

    let count = transactions.len();
    Statistics {
        count,
        avg_key_length: key_chars as f64 / count as f64,
        avg_value_length: value_chars as f64 / count as f64,
        largest_value: largest,
        common_prefixes: prefixes.top(TOP_PREFIXES),
    }
}

/// Prefixes of `key` of 1 to [`MAX_PREFIX_CHARS`] characters, always shorter
/// than the key itself.
///
/// ```
/// use immudb_explorer::stats::prefix_candidates;
///
/// let prefixes: Vec<_> = prefix_candidates("block:22").collect();
/// assert_eq!(prefixes, ["b", "bl", "blo", "bloc"]);
/// ```
pub fn prefix_candidates(key: &str) -> impl Iterator<Item = &str> {
    key.char_indices()
        .skip(1)
        .take(MAX_PREFIX_CHARS)
        .map(move |(end, _)| &key[..end])
}

/// Frequency table that remembers the order in which prefixes first appeared.
#[derive(Default)]
struct PrefixTally<'a> {
    counts: Vec<(&'a str, usize)>,
    slots: HashMap<&'a str, usize>,
}

impl<'a> PrefixTally<'a> {
    fn observe(&mut self, prefix: &'a str) {
        match self.slots.get(prefix) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.slots.insert(prefix, self.counts.len());
                self.counts.push((prefix, 1));
            }
        }
    }

    fn top(mut self, n: usize) -> Vec<PrefixCount> {
        // Stable sort keeps discovery order among equal counts.
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts
            .into_iter()
            .take(n)
            .map(|(prefix, count)| PrefixCount {
                prefix: prefix.to_string(),
                count,
            })
            .collect()
    }
}
