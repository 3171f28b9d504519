use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use tokio::time::Instant;
use tracing::{debug, warn};
use xmltree::Element;

use super::transport::{OutboundRequest, SendError, Transport};
use crate::constants::{api, headers};
use crate::document::{self, Document};
use crate::errors::{MgmtError, Result};

/// Values threaded into every request instead of process-wide constants
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSettings {
    pub base_url: String,
    pub api_version: String,
    pub namespace: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: api::DEFAULT_BASE_URL.to_string(),
            api_version: api::DEFAULT_API_VERSION.to_string(),
            namespace: api::DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl ApiSettings {
    /// Resolve a relative path against the base URL
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Outcome of a call that returned the expected status
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Value of `x-ms-request-id`, empty when the header was absent
    pub request_id: String,
    pub status: StatusCode,
    pub body: Option<Element>,
    pub elapsed: Duration,
}

/// Issues single authenticated requests and enforces the expected status code
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    settings: ApiSettings,
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn Transport>, settings: ApiSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    /// Send one request and return the request id and parsed body.
    ///
    /// Responses delivered through the transport's error channel are handled
    /// exactly like normal ones. A non-empty body is always parsed, so a
    /// malformed body fails with `ProtocolParse` even when the status is wrong.
    pub async fn execute(
        &self,
        uri: &str,
        method: Method,
        expected_status: StatusCode,
        body: Option<&Element>,
    ) -> Result<ApiResponse> {
        let started = Instant::now();

        let mut request_headers = vec![
            (
                headers::API_VERSION.to_string(),
                self.settings.api_version.clone(),
            ),
            (
                "Accept".to_string(),
                headers::XML_MEDIA_TYPE.to_string(),
            ),
        ];
        let payload = match body {
            Some(element) => {
                request_headers.push((
                    "Content-Type".to_string(),
                    headers::XML_MEDIA_TYPE.to_string(),
                ));
                Some(document::to_bytes(element, true)?)
            }
            None => None,
        };

        debug!("{} {} (expecting {})", method, uri, expected_status.as_u16());

        let request = OutboundRequest {
            method,
            uri: uri.to_string(),
            headers: request_headers,
            body: payload,
        };

        let (status, request_id, raw) = {
            let mut response = match self.transport.send(request).await {
                Ok(response) => response,
                Err(SendError::Status(response)) => response,
                Err(SendError::Connection(e)) => return Err(MgmtError::transport(uri, e)),
            };

            let status = response.status();
            let request_id = response.header(headers::REQUEST_ID).unwrap_or_default();
            let raw = response
                .read_body()
                .await
                .map_err(|e| MgmtError::transport(uri, e))?;
            (status, request_id, raw)
        };

        let parsed = if raw.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            Some(document::parse(&raw, uri)?)
        };

        if status != expected_status {
            warn!(
                "{} returned {} (expected {})",
                uri,
                status.as_u16(),
                expected_status.as_u16()
            );
            return Err(MgmtError::RequestFailed {
                uri: uri.to_string(),
                status,
                body: Document::from(parsed),
            });
        }

        Ok(ApiResponse {
            request_id,
            status,
            body: parsed,
            elapsed: started.elapsed(),
        })
    }
}
