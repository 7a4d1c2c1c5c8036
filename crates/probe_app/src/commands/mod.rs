//! One module per CLI command. Each returns the ledger of its run.
pub mod health;
pub mod maintenance;
pub mod reparse;
pub mod rescan;
pub mod smoke;
pub mod verify;
