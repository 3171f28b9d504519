//! Error types for the management API client
//!
//! Every failure aborts the current call and is handed to the caller with enough
//! context to diagnose it without re-querying the service. The only soft outcome
//! of a poll is a timeout, which is a normal [`crate::operation::OperationStatus`].

use reqwest::StatusCode;
use thiserror::Error;

use crate::document::Document;

/// Main error type for the management client
#[derive(Debug, Error)]
pub enum MgmtError {
    /// The connection could not be established or the response could not be read
    #[error("Transport failure calling {uri}: {reason}")]
    Transport { uri: String, reason: String },

    /// A body was not a well-formed document, or an expected element was missing or malformed
    #[error("Protocol error in {context}: {reason}")]
    ProtocolParse { context: String, reason: String },

    /// The server reported a `Status` text that is not a known operation status
    #[error("Get Operation Status {operation_id} returned unexpected status '{status}':\n{document}")]
    UnexpectedStatus {
        operation_id: String,
        status: String,
        document: Document,
    },

    /// The response status code differs from the one the caller expected
    #[error(
        "Call to {uri} returned an error:\nStatus Code: {} ({}):\n{body}",
        .status.as_u16(),
        .status.canonical_reason().unwrap_or("Unknown")
    )]
    RequestFailed {
        uri: String,
        status: StatusCode,
        body: Document,
    },

    /// Zero or several certificates matched the thumbprint
    #[error("A certificate with thumbprint '{thumbprint}' could not be located ({matches} matches)")]
    CredentialNotFound { thumbprint: String, matches: usize },

    /// A matching certificate was found but cannot be used as a TLS client identity
    #[error("Certificate {path} is not usable: {reason}")]
    InvalidCredential { path: String, reason: String },
}

impl MgmtError {
    pub fn protocol(context: impl Into<String>, reason: impl Into<String>) -> Self {
        MgmtError::ProtocolParse {
            context: context.into(),
            reason: reason.into(),
        }
    }

    pub fn transport(uri: impl Into<String>, reason: impl ToString) -> Self {
        MgmtError::Transport {
            uri: uri.into(),
            reason: reason.to_string(),
        }
    }

    /// Status code of a `RequestFailed` error
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            MgmtError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MgmtError>;
