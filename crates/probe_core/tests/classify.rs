use probe_core::{classify, FailReason, Outcome, Verification};
use pretty_assertions::assert_eq;

#[test]
fn new_rows_are_success_with_delta() {
    assert_eq!(classify(0, 3), Outcome::Success { delta: 3 });
    assert_eq!(classify(12, 20), Outcome::Success { delta: 8 });
}

#[test]
fn unchanged_nonzero_count_is_already_done() {
    let outcome = classify(5, 5);
    assert_eq!(outcome, Outcome::AlreadyDone);
    assert!(outcome.is_pass());
}

#[test]
fn unchanged_zero_count_is_failed() {
    let outcome = classify(0, 0);
    assert_eq!(
        outcome,
        Outcome::Failed {
            reason: FailReason::NoEffect
        }
    );
    assert!(!outcome.is_pass());
}

#[test]
fn shrinking_count_is_an_anomaly_not_a_failure() {
    let outcome = classify(7, 4);
    assert_eq!(outcome, Outcome::Anomaly { delta: -3 });
    assert!(!outcome.is_pass());
}

#[test]
fn repeat_run_goes_from_success_to_already_done() {
    let first = classify(0, 4);
    let second = classify(4, 4);
    assert_eq!(first, Outcome::Success { delta: 4 });
    assert_eq!(second, Outcome::AlreadyDone);
}

#[test]
fn verification_delta_needs_final_count() {
    let polled = Verification {
        label: "32:python".into(),
        outcome: Outcome::Success { delta: 3 },
        baseline: 0,
        final_count: Some(3),
        polls: 15,
    };
    assert_eq!(polled.delta(), Some(3));

    let cut_short = Verification {
        final_count: None,
        outcome: Outcome::Unreachable {
            reason: "timeout".into(),
        },
        polls: 0,
        ..polled
    };
    assert_eq!(cut_short.delta(), None);
}

#[test]
fn outcome_lines_are_readable() {
    assert_eq!(Outcome::Success { delta: 2 }.to_string(), "success (+2)");
    assert_eq!(
        Outcome::Failed {
            reason: FailReason::Rejected {
                code: 500,
                message: Some("parser offline".into())
            }
        }
        .to_string(),
        "failed: backend code 500: parser offline"
    );
}
