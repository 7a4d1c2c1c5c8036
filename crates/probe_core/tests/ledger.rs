use probe_core::{
    Category, Outcome, RunLedger, Tally, TriggerCall, TriggerRequest, Verdict,
    Verification,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    probe_logging::initialize_for_tests();
}

fn verification(label: &str, outcome: Outcome) -> Verification {
    Verification {
        label: label.into(),
        outcome,
        baseline: 0,
        final_count: Some(0),
        polls: 1,
    }
}

#[test]
fn tally_counts_each_verdict() {
    init_logging();
    let mut ledger = RunLedger::new();
    ledger.record_verification(&verification("32:python", Outcome::Success { delta: 5 }));
    ledger.record_verification(&verification("29:go", Outcome::AlreadyDone));
    ledger.record_verification(&verification(
        "31:rust",
        Outcome::Unreachable {
            reason: "http status 502".into(),
        },
    ));
    ledger.record("28:other", Verdict::Skipped, "not parseable");

    assert_eq!(
        ledger.tally(),
        Tally {
            total: 4,
            passed: 2,
            failed: 1,
            skipped: 1,
        }
    );
    assert!(!ledger.all_passed());

    let labels: Vec<_> = ledger.entries().iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["32:python", "29:go", "31:rust", "28:other"]);
    assert_eq!(ledger.entries()[2].detail, "unreachable: http status 502");
}

#[test]
fn skipped_items_do_not_fail_a_run() {
    let mut ledger = RunLedger::new();
    ledger.record("1:unknown", Verdict::Skipped, "not parseable");
    ledger.record_verification(&verification("2:php", Outcome::AlreadyDone));
    assert!(ledger.all_passed());
}

#[test]
fn reparse_call_carries_form_fields() {
    let call = TriggerCall::reparse(&TriggerRequest::new(32, "Python"));
    assert_eq!(call.path, "/project/reparse");
    assert_eq!(
        call.form,
        vec![
            ("projectId".to_string(), "32".to_string()),
            ("language".to_string(), "python".to_string()),
        ]
    );
}

#[test]
fn reparse_multiple_joins_categories() {
    let call = TriggerCall::reparse_multiple(
        1,
        &[Category::new("java"), Category::new("python"), Category::new("go")],
    );
    assert_eq!(call.path, "/project/reparse/multiple");
    assert_eq!(call.form[1], ("languages".to_string(), "java,python,go".to_string()));
}
