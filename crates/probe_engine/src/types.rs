use std::fmt;
use std::time::Duration;

use probe_core::FailReason;
use serde::Deserialize;
use serde_json::Value;

/// Sentinel the backend puts in `code` when it accepted a request.
pub const SUCCESS_CODE: i64 = 200;

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// JSON envelope the backend wraps every answer in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RespBody {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "data")]
    pub obj: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TriggerAck {
    pub status: u16,
    pub body: RespBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerFailure {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    MalformedBody,
    Rejected { code: i64, message: Option<String> },
}

impl TriggerFailure {
    /// True when the call never produced a usable HTTP 2xx answer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            TriggerFailure::InvalidUrl
                | TriggerFailure::HttpStatus(_)
                | TriggerFailure::Timeout
                | TriggerFailure::Network
        )
    }

    /// Business-level reason, for failures carried inside a 2xx answer.
    pub fn fail_reason(&self) -> Option<FailReason> {
        match self {
            TriggerFailure::MalformedBody => Some(FailReason::MalformedBody),
            TriggerFailure::Rejected { code, message } => Some(FailReason::Rejected {
                code: *code,
                message: message.clone(),
            }),
            _ => None,
        }
    }
}

impl fmt::Display for TriggerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerFailure::InvalidUrl => write!(f, "invalid url"),
            TriggerFailure::HttpStatus(code) => write!(f, "http status {code}"),
            TriggerFailure::Timeout => write!(f, "timeout"),
            TriggerFailure::Network => write!(f, "network error"),
            TriggerFailure::MalformedBody => write!(f, "malformed response body"),
            TriggerFailure::Rejected { code, .. } => write!(f, "backend code {code}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct TriggerError {
    pub kind: TriggerFailure,
    pub message: String,
}

impl TriggerError {
    pub(crate) fn new(kind: TriggerFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store query failed: {0}")]
    Query(String),
    #[error("refusing to purge with an empty pattern")]
    InvalidPattern,
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Configuration(_) => StoreError::Unavailable(err.to_string()),
            other => StoreError::Query(other.to_string()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// Nothing can be verified without the store; the run must stop.
    #[error("cannot read verification store: {0}")]
    StoreUnavailable(#[from] StoreError),
}
