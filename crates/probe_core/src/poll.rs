use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    Fixed,
    /// Each wait is `factor` times the previous one, capped at `max_interval`.
    /// A factor that is not finite or not above 1 keeps the interval fixed.
    Exponential { factor: f64, max_interval: Duration },
}

/// How long to wait for a remote job and how often to look at the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollPolicy {
    pub deadline: Duration,
    pub interval: Duration,
    pub backoff: Backoff,
    /// Stop at the first count that differs from the baseline.
    pub early_exit: bool,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(15),
            interval: Duration::from_secs(1),
            backoff: Backoff::Fixed,
            early_exit: false,
        }
    }
}

impl PollPolicy {
    pub fn fixed(deadline: Duration, interval: Duration) -> Self {
        Self {
            deadline,
            interval,
            ..Self::default()
        }
    }

    /// Sleep durations of one poll window; a store read follows each one.
    ///
    /// The steps always add up to the deadline. A zero deadline still yields a
    /// single zero-length step so the final count is read once.
    pub fn schedule(&self) -> Vec<Duration> {
        if self.deadline.is_zero() {
            return vec![Duration::ZERO];
        }
        if self.interval.is_zero() {
            return vec![self.deadline];
        }

        let mut steps = Vec::new();
        let mut elapsed = Duration::ZERO;
        let mut step = self.interval;
        while elapsed < self.deadline {
            let remaining = self.deadline - elapsed;
            let wait = step.min(remaining);
            steps.push(wait);
            elapsed += wait;
            step = self.next_step(step);
        }
        steps
    }

    fn next_step(&self, step: Duration) -> Duration {
        match self.backoff {
            Backoff::Fixed => step,
            Backoff::Exponential {
                factor,
                max_interval,
            } => {
                if !factor.is_finite() || factor <= 1.0 {
                    return step;
                }
                let cap = max_interval.max(step);
                Duration::try_from_secs_f64(step.as_secs_f64() * factor)
                    .map_or(cap, |next| next.min(cap))
            }
        }
    }
}
