use std::path::Path;

use anyhow::{Context, Result};
use probe_core::{RunLedger, Verdict};
use probe_engine::{MySqlStore, ServiceProbe};
use probe_logging::{probe_info, probe_warn};

use crate::config::ProbeConfig;
use crate::report;

/// Re-detect each project's primary language and store it when it changed.
pub async fn run(config: &ProbeConfig) -> Result<RunLedger> {
    let store = MySqlStore::connect(&config.store_settings())
        .await
        .context("connecting to the dependency store")?;
    let probe = ServiceProbe::new(
        config.backend_url.clone(),
        config.parser_url.clone(),
        &config.http_settings(),
    )?;
    let projects = store.projects().await?;
    probe_info!("Rescanning languages of {} projects", projects.len());

    let mut ledger = RunLedger::new();
    for project in &projects {
        let label = format!("{}:{}", project.id, project.name);
        let folder = Path::new(&project.file);
        if project.file.is_empty() || !folder.exists() {
            ledger.record(label, Verdict::Skipped, "project folder missing");
            report::last_entry(&ledger);
            continue;
        }

        match probe.detect_language(folder).await {
            Ok(Some(detected)) if detected == project.language => {
                ledger.record(label, Verdict::Pass, format!("unchanged ({detected})"));
            }
            Ok(Some(detected)) if !detected.is_known_language() => {
                ledger.record(
                    label,
                    Verdict::Skipped,
                    format!("detected {detected}, which has no parser"),
                );
            }
            Ok(Some(detected)) => {
                store.update_project_language(project.id, &detected).await?;
                probe_info!(
                    "Project {} language {} -> {}",
                    project.id,
                    project.language,
                    detected
                );
                ledger.record(
                    label,
                    Verdict::Pass,
                    format!("updated {} -> {}", project.language, detected),
                );
            }
            Ok(None) => {
                ledger.record(label, Verdict::Skipped, "language not detected");
            }
            Err(err) => {
                probe_warn!("Language detection failed for project {}: {}", project.id, err);
                ledger.record(label, Verdict::Fail, err.to_string());
            }
        }
        report::last_entry(&ledger);
    }

    report::summary(&ledger);
    Ok(ledger)
}
