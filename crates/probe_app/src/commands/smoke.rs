use anyhow::{Context, Result};
use probe_core::{Category, RunLedger, Verdict};
use probe_engine::{write_fixture, ServiceProbe};
use probe_logging::probe_debug;
use tempfile::TempDir;

use crate::config::ProbeConfig;
use crate::report;

pub const DEFAULT_LANGUAGES: [&str; 4] = ["python", "java", "javascript", "go"];

/// Write a fixture per language and run it through the parser service.
///
/// A language passes when the parser reports at least one dependency.
pub async fn run(config: &ProbeConfig, languages: &[String]) -> Result<RunLedger> {
    let categories: Vec<Category> = if languages.is_empty() {
        DEFAULT_LANGUAGES.iter().map(Category::new).collect()
    } else {
        languages.iter().map(Category::new).collect()
    };
    let probe = ServiceProbe::new(
        config.backend_url.clone(),
        config.parser_url.clone(),
        &config.http_settings(),
    )?;
    let workdir = TempDir::new().context("creating fixture directory")?;

    report::section("Parser smoke test");
    let mut ledger = RunLedger::new();
    for category in &categories {
        let label = category.to_string();
        let fixture = match write_fixture(workdir.path(), category) {
            Ok(fixture) => fixture,
            Err(err) => {
                ledger.record(label, Verdict::Skipped, err.to_string());
                report::last_entry(&ledger);
                continue;
            }
        };

        match probe.parse_manifest(category, &fixture.root).await {
            Ok(found) if found.is_empty() => {
                ledger.record(label, Verdict::Fail, "parser returned no dependencies");
            }
            Ok(found) => {
                probe_debug!("{} parser found {:?}", category, found);
                let expected = fixture
                    .expected_dependencies
                    .iter()
                    .filter(|name| found.iter().any(|f| f.contains(**name)))
                    .count();
                ledger.record(
                    label,
                    Verdict::Pass,
                    format!(
                        "{} dependencies, {}/{} expected",
                        found.len(),
                        expected,
                        fixture.expected_dependencies.len()
                    ),
                );
            }
            Err(err) => ledger.record(label, Verdict::Fail, err.to_string()),
        }
        report::last_entry(&ledger);
    }

    report::summary(&ledger);
    Ok(ledger)
}
