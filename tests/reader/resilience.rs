use immudb_explorer::client::{ClientError, ScanShape};
use immudb_explorer::{
    HealthState, ImmuDbReader, ReaderError, StateSummary, TransactionReader,
};

use crate::support::{connect, default_config, fixture_store, FlakyConnector};

#[test]
fn connecting_to_an_unreachable_store_fails() {
    let store = fixture_store(ScanShape::Pairs);
    let connector = store.connector();
    connector.set_reachable(false);

    let err = ImmuDbReader::connect(connector, default_config())
        .err()
        .expect("connection must fail");
    match err {
        ReaderError::Connection {
            address, source, ..
        } => {
            assert_eq!(address, "localhost:3322");
            assert!(matches!(source, ClientError::Unreachable { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn state_of_an_unreachable_store_is_null_not_an_error() {
    let store = fixture_store(ScanShape::Pairs);
    let connector = store.connector();
    let mut reader = connect(connector.clone());
    connector.set_reachable(false);

    let report = reader.get_state();
    assert_eq!(report.value, StateSummary::unavailable());
    assert_eq!(
        serde_json::to_value(&report.value).unwrap(),
        serde_json::json!({"txId": null, "merkleRoot": null})
    );
    assert!(matches!(
        report.faults.as_slice(),
        [ReaderError::StateQuery { .. }]
    ));
}

#[test]
fn failed_lookup_skips_only_that_entry() {
    let store = fixture_store(ScanShape::KeysOnly);
    let connector = FlakyConnector::new(&store);
    connector
        .plan()
        .failing_lookups
        .insert(b"log:9".to_vec());
    let mut reader = connect(connector);

    let report = reader.scan_all();
    assert_eq!(report.value.len(), 7);
    assert!(!report.value.contains_key("log:9"));
    assert!(report.value.contains_key("log:19"));
    assert!(matches!(
        report.faults.as_slice(),
        [ReaderError::EntryDecode { key, .. }] if key == "log:9"
    ));

    let health = reader.metrics().health();
    assert_eq!(health.state, HealthState::Degraded);
    assert_eq!(health.skipped_entries, 1);
}

#[test]
fn failed_scan_is_reported_and_recoverable() {
    let store = fixture_store(ScanShape::Pairs);
    let connector = FlakyConnector::new(&store);
    let mut reader = connect(connector.clone());

    connector.plan().fail_scans = true;
    for report in [
        reader.scan_all(),
        reader.scan_prefix("block:"),
        reader.scan_suffix(b"9"),
    ] {
        assert!(report.value.is_empty());
        assert!(matches!(report.faults.as_slice(), [ReaderError::Scan { .. }]));
    }
    assert_eq!(reader.metrics().health().state, HealthState::Unhealthy);

    connector.plan().fail_scans = false;
    let report = reader.scan_all();
    assert!(report.is_clean());
    assert_eq!(report.value.len(), 8);

    let snapshot = reader.metrics().snapshot();
    assert_eq!(snapshot.scan_failures, 3);
    assert_eq!(snapshot.scans_performed, 1);
    assert_eq!(snapshot.entries_decoded, 8);
}

#[test]
fn injected_state_failure_is_reported() {
    let store = fixture_store(ScanShape::Pairs);
    let connector = FlakyConnector::new(&store);
    let mut reader = connect(connector.clone());

    connector.plan().fail_state = true;
    let report = reader.get_state();
    assert!(!report.value.is_available());
    assert_eq!(report.faults.len(), 1);

    connector.plan().fail_state = false;
    assert_eq!(reader.get_state().into_value().tx_id, Some(8));
}

#[test]
fn reconnect_restores_a_session_after_an_outage() {
    let store = fixture_store(ScanShape::Pairs);
    let connector = store.connector();
    let mut reader = connect(connector.clone());

    connector.set_reachable(false);
    assert!(!reader.scan_all().is_clean());
    assert!(matches!(
        reader.reconnect(),
        Err(ReaderError::Connection { .. })
    ));

    connector.set_reachable(true);
    reader.reconnect().expect("store is back");
    let report = reader.scan_all();
    assert!(report.is_clean());
    assert_eq!(report.value.len(), 8);
    assert_eq!(reader.metrics().snapshot().reconnects, 1);
}
