use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailReason {
    /// The trigger was accepted but the store never changed from zero.
    NoEffect,
    /// The backend answered with a non-success sentinel code.
    Rejected { code: i64, message: Option<String> },
    /// The response body could not be decoded, so the code is unconfirmed.
    MalformedBody,
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailReason::NoEffect => write!(f, "no records written"),
            FailReason::Rejected { code, message } => match message {
                Some(message) => write!(f, "backend code {code}: {message}"),
                None => write!(f, "backend code {code}"),
            },
            FailReason::MalformedBody => write!(f, "malformed response body"),
        }
    }
}

/// Result of one verification, derived once polling ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { delta: u64 },
    AlreadyDone,
    Failed { reason: FailReason },
    Unreachable { reason: String },
    /// The count went down while polling; reported as is.
    Anomaly { delta: i64 },
}

impl Outcome {
    /// `AlreadyDone` passes: the effect already holds in the store.
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Success { .. } | Outcome::AlreadyDone)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success { delta } => write!(f, "success (+{delta})"),
            Outcome::AlreadyDone => write!(f, "already parsed"),
            Outcome::Failed { reason } => write!(f, "failed: {reason}"),
            Outcome::Unreachable { reason } => write!(f, "unreachable: {reason}"),
            Outcome::Anomaly { delta } => write!(f, "anomaly: count changed by {delta}"),
        }
    }
}

/// Classify the store counts observed around one trigger.
pub fn classify(baseline: u64, final_count: u64) -> Outcome {
    if final_count > baseline {
        Outcome::Success {
            delta: final_count - baseline,
        }
    } else if final_count < baseline {
        Outcome::Anomaly {
            delta: final_count as i64 - baseline as i64,
        }
    } else if baseline > 0 {
        Outcome::AlreadyDone
    } else {
        Outcome::Failed {
            reason: FailReason::NoEffect,
        }
    }
}

/// Report of a single verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub label: String,
    pub outcome: Outcome,
    pub baseline: u64,
    /// `None` when the run ended before polling.
    pub final_count: Option<u64>,
    /// Store reads performed after the baseline.
    pub polls: u32,
}

impl Verification {
    pub fn delta(&self) -> Option<i64> {
        self.final_count
            .map(|final_count| final_count as i64 - self.baseline as i64)
    }
}
