//! Probe core: pure model of a reparse verification run.
mod call;
mod category;
mod ledger;
mod outcome;
mod poll;

pub use call::TriggerCall;
pub use category::{Category, ParseRequestError, TriggerRequest, WorkItemId, KNOWN_LANGUAGES};
pub use ledger::{LedgerEntry, RunLedger, Tally, Verdict};
pub use outcome::{classify, FailReason, Outcome, Verification};
pub use poll::{Backoff, PollPolicy};
