use anyhow::Result;
use probe_core::{RunLedger, Verdict};
use probe_engine::{missing_columns, MySqlStore, ServiceProbe, ServiceStatus, StoreError};

use crate::config::ProbeConfig;
use crate::report;

const STORE_LABEL: &str = "store";

/// Probe the backend, the parser service and the dependency store.
pub async fn run(config: &ProbeConfig) -> Result<RunLedger> {
    let probe = ServiceProbe::new(
        config.backend_url.clone(),
        config.parser_url.clone(),
        &config.http_settings(),
    )?;

    report::section("Service health");
    let mut ledger = RunLedger::new();
    for status in [
        probe.check_backend(config.company_id).await,
        probe.check_parser().await,
    ] {
        record(&mut ledger, &status);
        report::last_entry(&ledger);
    }

    let columns = match MySqlStore::connect(&config.store_settings()).await {
        Ok(store) => store.white_list_columns().await,
        Err(err) => Err(err),
    };
    let (verdict, detail) = store_verdict(columns);
    ledger.record(STORE_LABEL, verdict, detail);
    report::last_entry(&ledger);
    Ok(ledger)
}

fn record(ledger: &mut RunLedger, status: &ServiceStatus) {
    match &status.result {
        Ok(code) => ledger.record(status.name, Verdict::Pass, format!("HTTP {code} {}", status.url)),
        Err(err) => ledger.record(status.name, Verdict::Fail, format!("{err} ({})", status.url)),
    }
}

fn store_verdict(columns: Result<Vec<String>, StoreError>) -> (Verdict, String) {
    match columns {
        Err(err) => (Verdict::Fail, err.to_string()),
        Ok(columns) if columns.is_empty() => (Verdict::Fail, "white_list table missing".into()),
        Ok(columns) => {
            let missing = missing_columns(&columns);
            if missing.is_empty() {
                (
                    Verdict::Pass,
                    format!("white_list present ({} columns)", columns.len()),
                )
            } else {
                (
                    Verdict::Fail,
                    format!("white_list lacks columns: {}", missing.join(", ")),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(columns: &[&str]) -> Vec<String> {
        columns.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn complete_table_passes() {
        let (verdict, detail) = store_verdict(Ok(names(&[
            "id",
            "name",
            "file_path",
            "description",
            "language",
            "isdelete",
        ])));
        assert_eq!(verdict, Verdict::Pass);
        assert_eq!(detail, "white_list present (6 columns)");
    }

    #[test]
    fn missing_table_fails() {
        let (verdict, detail) = store_verdict(Ok(Vec::new()));
        assert_eq!(verdict, Verdict::Fail);
        assert_eq!(detail, "white_list table missing");
    }

    #[test]
    fn missing_columns_are_named() {
        let (verdict, detail) = store_verdict(Ok(names(&["id", "name", "language"])));
        assert_eq!(verdict, Verdict::Fail);
        assert_eq!(detail, "white_list lacks columns: file_path, isdelete");
    }

    #[test]
    fn unreachable_store_fails() {
        let (verdict, detail) =
            store_verdict(Err(StoreError::Unavailable("connection refused".into())));
        assert_eq!(verdict, Verdict::Fail);
        assert_eq!(detail, "store unavailable: connection refused");
    }
}
