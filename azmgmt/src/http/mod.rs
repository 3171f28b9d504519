//! Authenticated request/response exchange with the management API
//!
//! # Architecture
//!
//! ```text
//! RequestExecutor → Transport (client certificate) → management endpoint
//!        ↑                         |
//!   (request id, body) ← ResponseHandle (normal return or error channel)
//! ```
//!
//! The executor owns the request contract: fixed API version header, XML
//! bodies, expected status code. The transport owns the connection and the TLS
//! identity, which keeps the executor testable against an in-memory transport.

pub mod executor;
pub mod transport;

pub use executor::{ApiResponse, ApiSettings, RequestExecutor};
pub use transport::{
    OutboundRequest, ReqwestTransport, ResponseHandle, SendError, Transport, TransportError,
};
