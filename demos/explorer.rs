//! Explorer walkthrough against the in-process store
//!
//! Run with: cargo run --example explorer
//! For scan traces: RUST_LOG=immudb_explorer=debug cargo run --example explorer

use immudb_explorer::api::prelude::*;
use immudb_explorer::client::{MemoryStore, ScanShape};
use immudb_explorer::export::{state_to_json, statistics_to_json, write_transactions};
use immudb_explorer::runtime::prelude::HealthStatus;
use immudb_explorer::{summarize, DashboardSession};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    println!("immudb explorer walkthrough\n");

    // Keys-only scans force a point read per entry, like older store clients.
    let store = MemoryStore::new().with_scan_shape(ScanShape::KeysOnly);
    for height in [1u32, 22, 309] {
        store.set(
            "defaultdb",
            format!("block:{height}"),
            format!("{{\"height\":{height}}}"),
        )?;
    }
    store.set("defaultdb", "log:9", "started")?;
    store.set("defaultdb", "log:19", "stopped")?;
    store.set("defaultdb", "tx:0009", vec![0xde, 0xad, 0xbe, 0xef])?;

    let config = ReaderConfig::new("immudb://localhost:3322", "defaultdb");
    let mut reader = ImmuDbReader::connect(store.connector(), config.clone())?;

    println!("All transactions");
    let all = reader.scan_all().into_value();
    for (key, value) in all.iter() {
        println!("  {key:<10} {value} ({})", value.encoding());
    }
    println!();

    let blocks = reader.scan_prefix("block:").into_value();
    println!("Prefix 'block:' -> {} entries", blocks.len());
    let nines = reader.scan_suffix(b"9").into_value();
    println!(
        "Suffix '9'      -> {:?}\n",
        nines.keys().collect::<Vec<_>>()
    );

    println!("State:      {}", state_to_json(&reader.get_state().into_value())?);
    println!("Statistics: {}\n", statistics_to_json(&summarize(&all))?);

    print_health(&reader.metrics().health());

    println!("\nDashboard session");
    let mut session = DashboardSession::connect(store.connector(), config)?;
    let info = session.database_info().into_value();
    println!(
        "  {} entries, avg key {:.2}, avg value {:.2}",
        info.quick_stats.count, info.quick_stats.avg_key_length, info.quick_stats.avg_value_length
    );
    for entry in session.quick_prefixes() {
        println!("  quick search '{}' ({} keys)", entry.prefix, entry.count);
    }

    let listing = session.fetch_all(10);
    println!("  listing {} of {} rows", listing.rows.len(), listing.total);

    let filter = Filter::from_terms(Some("log:"), None);
    let found = session.search(&filter)?;
    if !found.is_clean() {
        println!("  search recovered from {} faults", found.faults.len());
    }

    let dir = std::env::temp_dir().join("immudb_explorer_demo");
    std::fs::create_dir_all(&dir)?;
    let path = write_transactions(&dir, &filter, &found.value)?;
    println!("  exported {} entries to {}", found.value.len(), path.display());

    Ok(())
}

fn print_health(health: &HealthStatus) {
    println!("Health: {:?}", health.state);
    println!("  scans performed:   {}", health.scans_performed);
    println!("  failed operations: {}", health.failed_operations);
    println!("  skipped entries:   {}", health.skipped_entries);
    if let Some(secs) = health.last_operation_secs {
        println!("  last operation:    {secs}s ago");
    }
}
