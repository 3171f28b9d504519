//! Scripted in-memory transport
//!
//! Serves canned responses in order (the last one repeats once the script runs
//! out), records every request, and counts how many response handles were
//! opened and released.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use azmgmt::http::{
    ApiSettings, OutboundRequest, RequestExecutor, ResponseHandle, SendError, Transport,
    TransportError,
};
use reqwest::StatusCode;

use super::test_data::{API_VERSION, NAMESPACE};

#[derive(Debug, Clone)]
pub struct FakeResponse {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl FakeResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            headers: Vec::new(),
            body: body.into().into_bytes(),
        }
    }

    pub fn empty(status: u16) -> Self {
        Self::new(status, "")
    }

    pub fn with_request_id(mut self, request_id: &str) -> Self {
        self.headers
            .push(("x-ms-request-id".to_string(), request_id.to_string()));
        self
    }
}

#[derive(Default)]
struct HandleCounters {
    opened: AtomicUsize,
    released: AtomicUsize,
}

pub struct FakeTransport {
    script: Mutex<VecDeque<FakeResponse>>,
    requests: Mutex<Vec<OutboundRequest>>,
    counters: Arc<HandleCounters>,
    raise_for_status: bool,
    connection_error: Option<String>,
}

impl FakeTransport {
    /// Returns every response through the normal channel
    pub fn new(script: Vec<FakeResponse>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
            counters: Arc::new(HandleCounters::default()),
            raise_for_status: false,
            connection_error: None,
        }
    }

    /// Returns 4xx/5xx responses through `SendError::Status`
    pub fn raising(script: Vec<FakeResponse>) -> Self {
        Self {
            raise_for_status: true,
            ..Self::new(script)
        }
    }

    /// Never produces a response
    pub fn unreachable(reason: &str) -> Self {
        Self {
            connection_error: Some(reason.to_string()),
            ..Self::new(Vec::new())
        }
    }

    pub fn opened(&self) -> usize {
        self.counters.opened.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.counters.released.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn next_response(&self) -> FakeResponse {
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script
                .front()
                .cloned()
                .expect("fake transport has no scripted responses")
        }
    }
}

/// Executor over `transport` with the default namespace and API version
pub fn executor_for(transport: Arc<FakeTransport>) -> RequestExecutor {
    RequestExecutor::new(
        transport,
        ApiSettings {
            base_url: "https://management.test".to_string(),
            api_version: API_VERSION.to_string(),
            namespace: NAMESPACE.to_string(),
        },
    )
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(
        &self,
        request: OutboundRequest,
    ) -> Result<Box<dyn ResponseHandle>, SendError> {
        self.requests.lock().unwrap().push(request);

        if let Some(reason) = &self.connection_error {
            return Err(SendError::Connection(TransportError(reason.clone())));
        }

        let response = self.next_response();
        let is_error = response.status.is_client_error() || response.status.is_server_error();

        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        let handle: Box<dyn ResponseHandle> = Box::new(FakeHandle {
            response,
            counters: self.counters.clone(),
        });

        if self.raise_for_status && is_error {
            return Err(SendError::Status(handle));
        }
        Ok(handle)
    }
}

struct FakeHandle {
    response: FakeResponse,
    counters: Arc<HandleCounters>,
}

impl Drop for FakeHandle {
    fn drop(&mut self) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ResponseHandle for FakeHandle {
    fn status(&self) -> StatusCode {
        self.response.status
    }

    fn header(&self, name: &str) -> Option<String> {
        self.response
            .headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
    }

    async fn read_body(&mut self) -> Result<Vec<u8>, TransportError> {
        Ok(std::mem::take(&mut self.response.body))
    }
}
