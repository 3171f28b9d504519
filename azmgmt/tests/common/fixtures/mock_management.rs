//! Mock Service Management endpoint for testing
//!
//! Answers the hosted-service and operation-status calls over plain HTTP so the
//! reqwest transport can be exercised without a client certificate.

use std::sync::Arc;

use azmgmt::http::{ApiSettings, RequestExecutor, ReqwestTransport};
use reqwest::Client;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use super::test_data::{API_VERSION, NAMESPACE};

/// Mock management server that simulates Service Management API responses
pub struct MockManagementServer {
    pub server: MockServer,
    pub base_url: String,
}

impl MockManagementServer {
    /// Create a new mock management server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    pub fn settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.base_url.clone(),
            api_version: API_VERSION.to_string(),
            namespace: NAMESPACE.to_string(),
        }
    }

    /// Executor talking to this server through the reqwest transport
    pub fn executor(&self) -> RequestExecutor {
        RequestExecutor::new(
            Arc::new(ReqwestTransport::from_client(Client::new())),
            self.settings(),
        )
    }

    fn xml(status: u16, body: &str, request_id: &str) -> ResponseTemplate {
        ResponseTemplate::new(status)
            .insert_header("x-ms-request-id", request_id)
            .set_body_raw(body.as_bytes().to_vec(), "application/xml")
    }

    /// Mock Get Operation Status answering `body` every time
    pub async fn mock_operation_status(&self, subscription_id: &str, operation_id: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/{}/operations/{}", subscription_id, operation_id)))
            .and(header("x-ms-version", API_VERSION))
            .respond_with(Self::xml(200, body, "status-request"))
            .mount(&self.server)
            .await;
    }

    /// Mock Get Operation Status answering `first` for the first `times` polls,
    /// then falling through to whatever else is mounted
    pub async fn mock_operation_status_times(
        &self,
        subscription_id: &str,
        operation_id: &str,
        first: &str,
        times: u64,
    ) {
        Mock::given(method("GET"))
            .and(path(format!("/{}/operations/{}", subscription_id, operation_id)))
            .respond_with(Self::xml(200, first, "status-request"))
            .up_to_n_times(times)
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Mock any request to `request_path` answering `status` with `body`
    pub async fn mock_raw(&self, http_method: &str, request_path: &str, status: u16, body: &str) {
        Mock::given(method(http_method))
            .and(path(request_path.to_string()))
            .respond_with(Self::xml(status, body, "raw-request"))
            .mount(&self.server)
            .await;
    }

    /// Mock Get Hosted Service Properties with deployment details
    pub async fn mock_hosted_service(&self, subscription_id: &str, service: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(format!(
                "/{}/services/hostedservices/{}",
                subscription_id, service
            )))
            .and(query_param("embed-detail", "true"))
            .respond_with(Self::xml(200, body, "properties-request"))
            .mount(&self.server)
            .await;
    }

    /// Mock Change Deployment Configuration accepting the request
    pub async fn mock_change_configuration(
        &self,
        subscription_id: &str,
        service: &str,
        slot: &str,
        request_id: &str,
    ) {
        Mock::given(method("POST"))
            .and(path(format!(
                "/{}/services/hostedservices/{}/deploymentslots/{}/",
                subscription_id, service, slot
            )))
            .and(query_param("comp", "config"))
            .and(header("content-type", "application/xml"))
            .respond_with(ResponseTemplate::new(202).insert_header("x-ms-request-id", request_id))
            .mount(&self.server)
            .await;
    }

    /// Mock Swap Deployment accepting the request
    pub async fn mock_swap(&self, subscription_id: &str, service: &str, request_id: &str) {
        Mock::given(method("POST"))
            .and(path(format!(
                "/{}/services/hostedservices/{}",
                subscription_id, service
            )))
            .respond_with(ResponseTemplate::new(202).insert_header("x-ms-request-id", request_id))
            .mount(&self.server)
            .await;
    }

    /// Bodies of every POST the server received, as UTF-8
    pub async fn posted_bodies(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.method.as_str() == "POST")
            .map(|request| String::from_utf8_lossy(&request.body).into_owned())
            .collect()
    }
}
