//! Transport seam between the request executor and the network
//!
//! A transport hands back a [`ResponseHandle`] either as a normal return or, for
//! status codes it considers errors, inside [`SendError::Status`]. The executor
//! treats both the same way. Handles release their connection when dropped.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use thiserror::Error;
use tracing::debug;

use crate::certificate::Credential;
use crate::errors::{MgmtError, Result};

/// A fully prepared request
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl OutboundRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// An open response. Dropping it releases the underlying connection.
#[async_trait]
pub trait ResponseHandle: Send {
    fn status(&self) -> StatusCode;

    fn header(&self, name: &str) -> Option<String>;

    /// Read the remaining body; empty when the server sent none
    async fn read_body(&mut self) -> std::result::Result<Vec<u8>, TransportError>;
}

/// Failure modes of [`Transport::send`]
pub enum SendError {
    /// The server answered, but with a status the transport reports as an error
    Status(Box<dyn ResponseHandle>),
    /// No response was received
    Connection(TransportError),
}

impl fmt::Debug for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::Status(response) => f
                .debug_tuple("Status")
                .field(&response.status())
                .finish(),
            SendError::Connection(e) => f.debug_tuple("Connection").field(e).finish(),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: OutboundRequest,
    ) -> std::result::Result<Box<dyn ResponseHandle>, SendError>;
}

/// reqwest-backed transport authenticating with a client certificate
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(credential: &Credential, request_timeout: Option<Duration>) -> Result<Self> {
        let identity = credential.identity()?;
        let mut builder = Client::builder().identity(identity);
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| MgmtError::InvalidCredential {
            path: credential.path().display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { client })
    }

    /// Use a preconfigured client (no certificate is attached by this transport)
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: OutboundRequest,
    ) -> std::result::Result<Box<dyn ResponseHandle>, SendError> {
        let mut builder = self.client.request(request.method, &request.uri);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| SendError::Connection(TransportError(e.to_string())))?;

        debug!("{} answered {}", request.uri, response.status());

        let status = response.status();
        let handle: Box<dyn ResponseHandle> = Box::new(ReqwestResponse {
            status,
            headers: response.headers().clone(),
            response: Some(response),
        });

        // Mirror the convention of raising for 4xx/5xx; the executor normalizes it.
        if status.is_client_error() || status.is_server_error() {
            return Err(SendError::Status(handle));
        }
        Ok(handle)
    }
}

struct ReqwestResponse {
    status: StatusCode,
    headers: HeaderMap,
    response: Option<reqwest::Response>,
}

#[async_trait]
impl ResponseHandle for ReqwestResponse {
    fn status(&self) -> StatusCode {
        self.status
    }

    fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }

    async fn read_body(&mut self) -> std::result::Result<Vec<u8>, TransportError> {
        match self.response.take() {
            Some(response) => response
                .bytes()
                .await
                .map(|bytes| bytes.to_vec())
                .map_err(|e| TransportError(e.to_string())),
            None => Ok(Vec::new()),
        }
    }
}
