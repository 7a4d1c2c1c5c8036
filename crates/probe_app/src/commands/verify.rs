use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use probe_core::{Outcome, RunLedger, TriggerRequest, Verdict};
use probe_engine::{
    AsyncEffectVerifier, CountQuery, HttpTrigger, MySqlStore, ProjectRow, ServiceProbe,
};
use probe_logging::{probe_debug, probe_info, probe_warn};

use crate::config::ProbeConfig;
use crate::report;

/// Verify each item in turn; a store failure aborts the whole run.
pub async fn run(config: &ProbeConfig, items: Vec<TriggerRequest>) -> Result<RunLedger> {
    let items = if items.is_empty() {
        config.targets()?
    } else {
        items
    };
    if items.is_empty() {
        bail!("no verification targets; pass --item ID:LANG or set `targets` in the config");
    }

    let store = Arc::new(
        MySqlStore::connect(&config.store_settings())
            .await
            .context("connecting to the dependency store")?,
    );
    let trigger = Arc::new(HttpTrigger::new(
        config.backend_url.clone(),
        &config.http_settings(),
    )?);
    let verifier = AsyncEffectVerifier::new(trigger, store.clone(), config.poll_policy());
    let policy = verifier.policy();
    probe_info!(
        "Verifying {} items, deadline={:?} early_exit={}",
        items.len(),
        policy.deadline,
        policy.early_exit
    );

    report::section("Dependency counts before");
    report::language_stats(&store.language_stats().await?);

    let mut ledger = RunLedger::new();
    for (index, request) in items.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(config.pause_between_items()).await;
        }
        report::section(&format!(
            "Project {} ({})",
            request.work_item, request.category
        ));

        if !request.category.is_parseable() {
            probe_warn!("Skipping {}: category not parseable", request.label());
            ledger.record(request.label(), Verdict::Skipped, "category not parseable");
            report::last_entry(&ledger);
            continue;
        }

        println!(
            "Triggering reparse, waiting up to {:?}...",
            verifier.policy().deadline
        );
        let verification = verifier
            .verify(request)
            .await
            .with_context(|| format!("verifying {}", request.label()))?;
        report::verification(&verification);
        ledger.record_verification(&verification);
        report::last_entry(&ledger);

        if verification.outcome.is_pass() {
            let query = CountQuery::for_category(request.category.clone());
            let entries = store.recent_entries(&query, config.recent_entries).await?;
            report::recent_entries(&entries);
        }
    }

    report::section("Dependency counts after");
    report::language_stats(&store.language_stats().await?);
    report::summary(&ledger);
    Ok(ledger)
}

/// Verify every project in the store against the rows of its own folder.
///
/// Projects whose folder is gone are skipped. A project that yields no rows is
/// run through the parser service directly to tell a parser problem from a
/// backend one.
pub async fn run_projects(config: &ProbeConfig) -> Result<RunLedger> {
    let store = Arc::new(
        MySqlStore::connect(&config.store_settings())
            .await
            .context("connecting to the dependency store")?,
    );
    let trigger = Arc::new(HttpTrigger::new(
        config.backend_url.clone(),
        &config.http_settings(),
    )?);
    let parser = ServiceProbe::new(
        config.backend_url.clone(),
        config.parser_url.clone(),
        &config.http_settings(),
    )?;
    let verifier = AsyncEffectVerifier::new(trigger, store.clone(), config.poll_policy());

    let projects = store.projects().await?;
    if projects.is_empty() {
        bail!("no projects in the store");
    }
    probe_info!("Verifying {} projects by folder", projects.len());

    report::section("Dependency counts before");
    report::language_stats(&store.language_stats().await?);

    let mut ledger = RunLedger::new();
    for (index, project) in projects.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(config.pause_between_items()).await;
        }
        report::section(&format!(
            "Project {} {} ({})",
            project.id, project.name, project.language
        ));
        let label = format!("{}:{}", project.id, project.language);

        if !project.language.is_parseable() {
            ledger.record(label, Verdict::Skipped, "category not parseable");
            report::last_entry(&ledger);
            continue;
        }
        if project.file.is_empty() || !Path::new(&project.file).exists() {
            probe_warn!("Skipping {}: folder {:?} missing", label, project.file);
            ledger.record(label, Verdict::Skipped, "project folder missing");
            report::last_entry(&ledger);
            continue;
        }

        let verification = verifier
            .verify_project(project)
            .await
            .with_context(|| format!("verifying {label}"))?;
        report::verification(&verification);
        ledger.record_verification(&verification);
        report::last_entry(&ledger);

        match &verification.outcome {
            outcome if outcome.is_pass() => {
                let entries = store
                    .recent_entries(&project.count_query(), config.recent_entries)
                    .await?;
                report::recent_entries(&entries);
            }
            Outcome::Failed { .. } => diagnose(&parser, project).await,
            _ => {}
        }
    }

    report::section("Dependency counts after");
    report::language_stats(&store.language_stats().await?);
    report::summary(&ledger);
    Ok(ledger)
}

async fn diagnose(parser: &ServiceProbe, project: &ProjectRow) {
    println!("Asking the parser service directly...");
    match parser
        .parse_manifest(&project.language, Path::new(&project.file))
        .await
    {
        Ok(found) if found.is_empty() => {
            println!("  parser found no dependencies; the folder may lack a manifest");
        }
        Ok(found) => {
            probe_debug!("{} parser answer {:?}", project.id, found);
            println!(
                "  parser found {} dependencies; the backend did not store them",
                found.len()
            );
            for name in found.iter().take(5) {
                println!("    - {name}");
            }
        }
        Err(err) => println!("  parser call failed: {err}"),
    }
}
