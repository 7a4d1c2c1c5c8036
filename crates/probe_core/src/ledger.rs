use crate::Verification;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub label: String,
    pub verdict: Verdict,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Per-item results of one run, kept in the order items were processed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunLedger {
    entries: Vec<LedgerEntry>,
}

impl RunLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, label: impl Into<String>, verdict: Verdict, detail: impl Into<String>) {
        self.entries.push(LedgerEntry {
            label: label.into(),
            verdict,
            detail: detail.into(),
        });
    }

    pub fn record_verification(&mut self, verification: &Verification) {
        let verdict = if verification.outcome.is_pass() {
            Verdict::Pass
        } else {
            Verdict::Fail
        };
        self.record(
            verification.label.clone(),
            verdict,
            verification.outcome.to_string(),
        );
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn tally(&self) -> Tally {
        self.entries
            .iter()
            .fold(Tally::default(), |mut tally, entry| {
                tally.total += 1;
                match entry.verdict {
                    Verdict::Pass => tally.passed += 1,
                    Verdict::Fail => tally.failed += 1,
                    Verdict::Skipped => tally.skipped += 1,
                }
                tally
            })
    }

    pub fn all_passed(&self) -> bool {
        self.entries
            .iter()
            .all(|entry| entry.verdict != Verdict::Fail)
    }
}
