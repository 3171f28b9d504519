use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Serialize, Serializer};

/// Status of an asynchronous operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperationStatus {
    InProgress,
    Failed,
    Succeeded,
    /// Synthesized by the poller when the deadline passes; never sent by the server
    TimedOut,
}

impl OperationStatus {
    pub fn is_terminal(&self) -> bool {
        match self {
            OperationStatus::InProgress => false,
            OperationStatus::Failed | OperationStatus::Succeeded | OperationStatus::TimedOut => {
                true
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationStatus::InProgress => "InProgress",
            OperationStatus::Failed => "Failed",
            OperationStatus::Succeeded => "Succeeded",
            OperationStatus::TimedOut => "TimedOut",
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

/// Parses the `Status` text of a status document. Only the three values the
/// server can send are accepted.
impl FromStr for OperationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "InProgress" => Ok(OperationStatus::InProgress),
            "Failed" => Ok(OperationStatus::Failed),
            "Succeeded" => Ok(OperationStatus::Succeeded),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Error payload of a failed operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationFailure {
    pub code: String,
    pub message: String,
}

/// Terminal outcome of one polling session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationResult {
    pub status: OperationStatus,
    /// Present only for `Failed` and `Succeeded`
    #[serde(serialize_with = "serialize_status_code")]
    pub status_code: Option<StatusCode>,
    #[serde(serialize_with = "serialize_elapsed")]
    pub elapsed: Duration,
    /// Present only for `Failed`
    pub failure: Option<OperationFailure>,
    pub started_at: DateTime<Utc>,
}

impl OperationResult {
    pub fn succeeded(status_code: StatusCode, elapsed: Duration, started_at: DateTime<Utc>) -> Self {
        Self {
            status: OperationStatus::Succeeded,
            status_code: Some(status_code),
            elapsed,
            failure: None,
            started_at,
        }
    }

    pub fn failed(
        status_code: StatusCode,
        failure: OperationFailure,
        elapsed: Duration,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            status: OperationStatus::Failed,
            status_code: Some(status_code),
            elapsed,
            failure: Some(failure),
            started_at,
        }
    }

    pub fn timed_out(elapsed: Duration, started_at: DateTime<Utc>) -> Self {
        Self {
            status: OperationStatus::TimedOut,
            status_code: None,
            elapsed,
            failure: None,
            started_at,
        }
    }
}

fn serialize_status_code<S: Serializer>(
    code: &Option<StatusCode>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match code {
        Some(code) => serializer.serialize_some(&code.as_u16()),
        None => serializer.serialize_none(),
    }
}

fn serialize_elapsed<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}
