//! Probe engine: HTTP triggers, store access and the effect verifier.
mod fixtures;
mod http;
mod services;
mod store;
mod trigger;
mod types;
mod verifier;

pub use fixtures::{write_fixture, Fixture, FixtureError};
pub use services::{parser_endpoint, ServiceProbe, ServiceStatus};
pub use store::{
    like_contains, missing_columns, CountQuery, CountStore, LanguageCount, MySqlStore, ProjectRow,
    StoreSettings, WhitelistEntry, REQUIRED_WHITELIST_COLUMNS,
};
pub use trigger::{HttpTrigger, Trigger};
pub use types::{
    HttpSettings, RespBody, StoreError, TriggerAck, TriggerError, TriggerFailure, VerifyError,
    SUCCESS_CODE,
};
pub use verifier::AsyncEffectVerifier;
