use anyhow::{bail, Context, Result};
use probe_core::{Category, RunLedger, TriggerCall, TriggerRequest, Verdict};
use probe_engine::{HttpTrigger, MySqlStore, Trigger};
use probe_logging::{probe_info, probe_warn};

use crate::config::ProbeConfig;
use crate::report;

/// Fire a reparse for every project, or only those without dependency rows.
///
/// Fire-and-forget: parsing happens in the backend afterwards.
pub async fn run_all(config: &ProbeConfig, missing_only: bool) -> Result<RunLedger> {
    let store = MySqlStore::connect(&config.store_settings())
        .await
        .context("connecting to the dependency store")?;
    let projects = if missing_only {
        store.projects_without_components().await?
    } else {
        store.projects().await?
    };
    probe_info!("Found {} projects to reparse", projects.len());
    if projects.is_empty() {
        println!("Nothing to reparse.");
        return Ok(RunLedger::new());
    }

    let trigger = HttpTrigger::new(config.backend_url.clone(), &config.http_settings())?;
    let mut ledger = RunLedger::new();
    for project in &projects {
        report::rule();
        println!("Project {}: {} ({})", project.id, project.name, project.language);
        let label = format!("{}:{}", project.id, project.language);

        if !project.language.is_parseable() {
            ledger.record(label, Verdict::Skipped, "language not supported for parsing");
            report::last_entry(&ledger);
            continue;
        }

        let request = TriggerRequest::new(project.id, project.language.clone());
        match trigger.fire(&TriggerCall::reparse(&request)).await {
            Ok(_) => {
                ledger.record(label, Verdict::Pass, "reparse triggered");
                report::last_entry(&ledger);
                tokio::time::sleep(config.pause_between_items()).await;
            }
            Err(err) => {
                probe_warn!("Reparse of project {} failed: {}", project.id, err);
                ledger.record(label, Verdict::Fail, err.to_string());
                report::last_entry(&ledger);
            }
        }
    }

    report::summary(&ledger);
    println!();
    println!("Parsing runs in the background; check the white_list table in a minute.");
    Ok(ledger)
}

/// Fire one batch reparse of a project for several languages.
pub async fn run_multiple(
    config: &ProbeConfig,
    project_id: i64,
    languages: &[String],
) -> Result<RunLedger> {
    let categories: Vec<Category> = languages
        .iter()
        .map(Category::new)
        .filter(Category::is_parseable)
        .collect();
    if categories.is_empty() {
        bail!("no parseable languages given");
    }

    let trigger = HttpTrigger::new(config.backend_url.clone(), &config.http_settings())?;
    let call = TriggerCall::reparse_multiple(project_id, &categories);
    let label = format!(
        "{}:{}",
        project_id,
        categories
            .iter()
            .map(Category::as_str)
            .collect::<Vec<_>>()
            .join(",")
    );

    let mut ledger = RunLedger::new();
    match trigger.fire(&call).await {
        Ok(ack) => {
            let detail = ack
                .body
                .message
                .unwrap_or_else(|| "batch reparse triggered".to_string());
            ledger.record(label, Verdict::Pass, detail);
        }
        Err(err) => ledger.record(label, Verdict::Fail, err.to_string()),
    }
    report::summary(&ledger);
    Ok(ledger)
}
