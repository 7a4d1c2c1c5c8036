use std::time::Duration;

use probe_core::{Backoff, PollPolicy};
use pretty_assertions::assert_eq;

fn total(steps: &[Duration]) -> Duration {
    steps.iter().sum()
}

#[test]
fn default_policy_waits_full_deadline_in_one_second_steps() {
    let policy = PollPolicy::default();
    assert!(!policy.early_exit);
    let steps = policy.schedule();
    assert_eq!(steps.len(), 15);
    assert!(steps.iter().all(|step| *step == Duration::from_secs(1)));
    assert_eq!(total(&steps), Duration::from_secs(15));
}

#[test]
fn last_step_is_truncated_to_deadline() {
    let policy = PollPolicy::fixed(Duration::from_millis(2500), Duration::from_secs(1));
    assert_eq!(
        policy.schedule(),
        vec![
            Duration::from_secs(1),
            Duration::from_secs(1),
            Duration::from_millis(500)
        ]
    );
}

#[test]
fn zero_deadline_still_reads_once() {
    let policy = PollPolicy::fixed(Duration::ZERO, Duration::from_secs(1));
    assert_eq!(policy.schedule(), vec![Duration::ZERO]);
}

#[test]
fn zero_interval_waits_whole_deadline_once() {
    let policy = PollPolicy::fixed(Duration::from_secs(10), Duration::ZERO);
    assert_eq!(policy.schedule(), vec![Duration::from_secs(10)]);
}

#[test]
fn exponential_backoff_grows_and_caps() {
    let policy = PollPolicy {
        deadline: Duration::from_secs(20),
        interval: Duration::from_secs(1),
        backoff: Backoff::Exponential {
            factor: 2.0,
            max_interval: Duration::from_secs(5),
        },
        early_exit: true,
    };
    let steps = policy.schedule();
    assert_eq!(
        steps,
        vec![
            Duration::from_secs(1),
            Duration::from_secs(2),
            Duration::from_secs(4),
            Duration::from_secs(5),
            Duration::from_secs(5),
            Duration::from_secs(3),
        ]
    );
    assert_eq!(total(&steps), Duration::from_secs(20));
}

#[test]
fn huge_factor_jumps_straight_to_the_cap() {
    let policy = PollPolicy {
        deadline: Duration::from_secs(10),
        interval: Duration::from_secs(1),
        backoff: Backoff::Exponential {
            factor: 1e300,
            max_interval: Duration::from_secs(4),
        },
        early_exit: false,
    };
    let steps = policy.schedule();
    assert_eq!(
        steps,
        vec![
            Duration::from_secs(1),
            Duration::from_secs(4),
            Duration::from_secs(4),
            Duration::from_secs(1),
        ]
    );
}

#[test]
fn non_finite_factor_keeps_the_interval_fixed() {
    for factor in [f64::NAN, f64::INFINITY] {
        let policy = PollPolicy {
            deadline: Duration::from_secs(3),
            interval: Duration::from_secs(1),
            backoff: Backoff::Exponential {
                factor,
                max_interval: Duration::from_secs(4),
            },
            early_exit: false,
        };
        assert_eq!(policy.schedule(), vec![Duration::from_secs(1); 3]);
    }
}
