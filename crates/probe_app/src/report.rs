//! Console report lines. Logging goes through `probe_logging`; these are the
//! human-facing status lines of a run.

use probe_core::{LedgerEntry, RunLedger, Verdict, Verification};
use probe_engine::{LanguageCount, WhitelistEntry};

const RULE_WIDTH: usize = 60;
const DESCRIPTION_WIDTH: usize = 80;

pub fn section(title: &str) {
    println!();
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("  {title}");
    println!("{}", "=".repeat(RULE_WIDTH));
}

pub fn rule() {
    println!("{}", "-".repeat(RULE_WIDTH));
}

fn verdict_tag(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Pass => "[PASS]",
        Verdict::Fail => "[FAIL]",
        Verdict::Skipped => "[SKIP]",
    }
}

pub fn entry(entry: &LedgerEntry) {
    println!("{} {}: {}", verdict_tag(entry.verdict), entry.label, entry.detail);
}

pub fn last_entry(ledger: &RunLedger) {
    if let Some(last) = ledger.entries().last() {
        entry(last);
    }
}

pub fn verification(verification: &Verification) {
    match (verification.final_count, verification.delta()) {
        (Some(final_count), Some(delta)) => println!(
            "  baseline={} final={} delta={:+} polls={}",
            verification.baseline, final_count, delta, verification.polls
        ),
        _ => println!("  baseline={} (no polling)", verification.baseline),
    }
}

pub fn language_stats(stats: &[LanguageCount]) {
    if stats.is_empty() {
        println!("  no dependency rows");
        return;
    }
    let mut total = 0;
    for row in stats {
        let language = if row.language.is_empty() {
            "(none)"
        } else {
            row.language.as_str()
        };
        println!("  {:15} {:>6}", language, row.count);
        total += row.count;
    }
    println!("  {:15} {:>6}", "total", total);
}

pub fn recent_entries(entries: &[WhitelistEntry]) {
    for entry in entries {
        println!("  [{}] {}", entry.id, entry.name);
        if let Some(description) = entry.description.as_deref().filter(|d| !d.is_empty()) {
            println!("      {}", truncate(description, DESCRIPTION_WIDTH));
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{head}...")
}

pub fn summary(ledger: &RunLedger) {
    section("Summary");
    for item in ledger.entries() {
        entry(item);
    }
    let tally = ledger.tally();
    println!();
    println!("Total:   {}", tally.total);
    println!("Passed:  {}", tally.passed);
    println!("Failed:  {}", tally.failed);
    println!("Skipped: {}", tally.skipped);
}
