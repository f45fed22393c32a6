use crate::client::{ScanItem, StoreClient};
use crate::error::ReaderError;
use crate::types::Entry;

const UNKNOWN_KEY: &str = "<unknown>";

/// Turns one scan item into an [`Entry`].
///
/// Bare keys are resolved with a point read. Items that cannot be turned into
/// a key/value pair come back as [`ReaderError::EntryDecode`] so the caller
/// can skip them.
pub(crate) fn normalize<C: StoreClient>(
    client: &mut C,
    item: ScanItem,
) -> Result<Entry, ReaderError> {
    match item {
        ScanItem::Pair(key, value) => Ok(Entry { key, value }),
        ScanItem::Record(record) => match (record.key(), record.value()) {
            (Some(key), Some(value)) => Ok(Entry::new(key, value)),
            (Some(key), None) => Err(ReaderError::entry(key, "record exposes no value")),
            (None, _) => Err(ReaderError::EntryDecode {
                key: UNKNOWN_KEY.to_string(),
                reason: "record exposes no key".to_string(),
            }),
        },
        ScanItem::Key(key) => match client.get(&key) {
            Ok(point) => Ok(Entry {
                value: point.into_bytes(),
                key,
            }),
            Err(source) => Err(ReaderError::entry(
                &key,
                format!("value lookup failed: {source}"),
            )),
        },
        ScanItem::Unrecognized(description) => Err(ReaderError::EntryDecode {
            key: UNKNOWN_KEY.to_string(),
            reason: format!("unrecognized entry shape: {description}"),
        }),
    }
}
