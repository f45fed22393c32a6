use immudb_explorer::client::ScanShape;
use immudb_explorer::stats::summarize;
use immudb_explorer::{TransactionReader, TransactionSet};

use crate::support::{connect, fixture_store, FlakyConnector};

const SHAPES: [ScanShape; 3] = [ScanShape::Pairs, ScanShape::Records, ScanShape::KeysOnly];

fn is_subset(part: &TransactionSet, whole: &TransactionSet) -> bool {
    part.iter().all(|(key, value)| whole.get(key) == Some(value))
}

#[test]
fn prefix_results_are_a_matching_subset_of_all() {
    for shape in SHAPES {
        let store = fixture_store(shape);
        let mut reader = connect(store.connector());
        let all = reader.scan_all().into_value();
        assert_eq!(all.len(), 8, "shape {shape:?}");

        for prefix in ["", "b", "block:", "block:3", "log:", "zzz", "raw"] {
            let report = reader.scan_prefix(prefix);
            assert!(report.is_clean(), "shape {shape:?}: {:?}", report.faults);
            let found = report.value;
            assert!(is_subset(&found, &all), "prefix {prefix:?}, shape {shape:?}");
            assert!(found.keys().all(|key| key.starts_with(prefix)));
            let expected = all.keys().filter(|key| key.starts_with(prefix)).count();
            assert_eq!(found.len(), expected, "prefix {prefix:?}, shape {shape:?}");
        }
    }
}

#[test]
fn prefix_is_revalidated_when_the_store_ignores_it() {
    let store = fixture_store(ScanShape::Pairs);
    let connector = FlakyConnector::new(&store);
    connector.plan().ignore_prefix = true;
    let mut reader = connect(connector);

    let found = reader.scan_prefix("log:").into_value();
    let mut keys: Vec<_> = found.keys().collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["log:19", "log:9"]);
}

#[test]
fn suffix_results_are_a_raw_byte_subset_of_all() {
    for shape in SHAPES {
        let store = fixture_store(shape);
        let mut reader = connect(store.connector());
        let all = reader.scan_all().into_value();

        let cases: [(&[u8], &[&str]); 4] = [
            (b"9", &["block:309", "log:9", "log:19", "tx:0009"]),
            (b"22", &["block:22"]),
            (&[0xff], &["raw\u{fffd}"]),
            (b"nothing", &[]),
        ];
        for (suffix, expected) in cases {
            let report = reader.scan_suffix(suffix);
            assert!(report.is_clean(), "shape {shape:?}: {:?}", report.faults);
            let found = report.value;
            assert!(is_subset(&found, &all));
            let mut keys: Vec<_> = found.keys().collect();
            keys.sort_unstable();
            let mut expected = expected.to_vec();
            expected.sort_unstable();
            assert_eq!(keys, expected, "suffix {suffix:?}, shape {shape:?}");
        }
    }
}

#[test]
fn replacement_character_suffix_does_not_match_invalid_bytes() {
    let store = fixture_store(ScanShape::Pairs);
    let mut reader = connect(store.connector());
    let found = reader.scan_suffix("\u{fffd}".as_bytes()).into_value();
    assert!(found.is_empty());
}

#[test]
fn binary_values_round_trip() {
    let store = fixture_store(ScanShape::KeysOnly);
    let mut reader = connect(store.connector());
    let all = reader.scan_all().into_value();

    let value = all.get("tx:0009").expect("binary entry present");
    assert!(value.is_binary());
    assert_eq!(value.as_str(), "3q2+7w==");
    assert_eq!(value.to_bytes().unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);

    let text = all.get("block:309").unwrap();
    assert!(!text.is_binary());
    assert_eq!(text.as_str(), "{\"height\":309}");
}

#[test]
fn statistics_over_a_prefix_scan() {
    let store = fixture_store(ScanShape::Pairs);
    let mut reader = connect(store.connector());
    let blocks = reader.scan_prefix("block:").into_value();

    let stats = summarize(&blocks);
    assert_eq!(stats.count, 3);
    assert_eq!(stats.largest_value.key, "block:309");
    assert_eq!(stats.largest_value.size, 14);
    assert_eq!(stats.common_prefixes[0].prefix, "b");
    assert_eq!(stats.common_prefixes[0].count, 3);
    assert_eq!(summarize(&blocks), stats);
}

#[test]
fn state_tracks_committed_transactions() {
    let store = fixture_store(ScanShape::Pairs);
    let mut reader = connect(store.connector());

    let before = reader.get_state().into_value();
    assert_eq!(before.tx_id, Some(8));

    store
        .set(immudb_explorer::client::memory::DEFAULT_DATABASE, "log:20", "stopped")
        .unwrap();
    let after = reader.get_state().into_value();
    assert_eq!(after.tx_id, Some(9));
    assert_ne!(before.merkle_root, after.merkle_root);
    assert_eq!(after.merkle_root.map(|root| root.len()), Some(64));
}
