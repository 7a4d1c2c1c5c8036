use anyhow::{Context, Result};
use probe_core::{RunLedger, Verdict};
use probe_engine::MySqlStore;

use crate::config::ProbeConfig;
use crate::report;

async fn connect(config: &ProbeConfig) -> Result<MySqlStore> {
    MySqlStore::connect(&config.store_settings())
        .await
        .context("connecting to the dependency store")
}

pub async fn stats(config: &ProbeConfig) -> Result<RunLedger> {
    let store = connect(config).await?;
    report::section("Dependency counts by language");
    report::language_stats(&store.language_stats().await?);
    Ok(RunLedger::new())
}

/// Remove injected fixture rows.
pub async fn purge(config: &ProbeConfig, pattern: &str) -> Result<RunLedger> {
    let store = connect(config).await?;
    let deleted = store.purge_fixture_rows(pattern).await?;
    let mut ledger = RunLedger::new();
    ledger.record(
        format!("purge {pattern:?}"),
        Verdict::Pass,
        format!("{deleted} rows deleted"),
    );
    report::last_entry(&ledger);
    Ok(ledger)
}
