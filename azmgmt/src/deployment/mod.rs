//! Hosted-service workflows built on the request executor
//!
//! Reading a deployment's configuration, rewriting named role settings and
//! swapping the production and staging slots. The mutating calls answer
//! `202 Accepted`; the returned request id is what the operation poller tracks.

pub mod properties;
pub mod settings;

pub use properties::{DeploymentNames, HostedService, InputEndpoint};
pub use settings::{apply_settings, EditedConfiguration};

use reqwest::{Method, StatusCode};
use tracing::{info, instrument};
use xmltree::{Element, XMLNode};

use crate::document;
use crate::encoding;
use crate::errors::{MgmtError, Result};
use crate::http::RequestExecutor;

/// Outcome of a slot swap request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The swap was accepted; poll this request id
    Accepted { request_id: String, names: DeploymentNames },
    /// Nothing is deployed to staging, so no request was sent
    NothingStaged,
}

#[derive(Clone)]
pub struct HostedServiceClient {
    executor: RequestExecutor,
    subscription_id: String,
}

impl HostedServiceClient {
    pub fn new(executor: RequestExecutor, subscription_id: impl Into<String>) -> Self {
        Self {
            executor,
            subscription_id: subscription_id.into(),
        }
    }

    fn namespace(&self) -> &str {
        &self.executor.settings().namespace
    }

    pub fn service_uri(&self, service: &str) -> String {
        self.executor.settings().url(&format!(
            "{}/services/hostedservices/{}",
            self.subscription_id, service
        ))
    }

    /// Get Hosted Service Properties including deployment details
    #[instrument(skip(self))]
    pub async fn properties(&self, service: &str) -> Result<HostedService> {
        let uri = format!("{}?embed-detail=true", self.service_uri(service));
        let response = self
            .executor
            .execute(&uri, Method::GET, StatusCode::OK, None)
            .await?;

        let root = response.body.ok_or_else(|| {
            MgmtError::protocol(uri.as_str(), "Get Hosted Service Properties returned an empty body")
        })?;
        info!("x-ms-request-id: {}", response.request_id);

        Ok(HostedService::new(response.request_id, root, self.namespace()))
    }

    /// Post a new service configuration to `slot`; returns the request id to poll
    #[instrument(skip(self, configuration))]
    pub async fn change_configuration(
        &self,
        service: &str,
        slot: &str,
        configuration: &Element,
    ) -> Result<String> {
        let uri = self.executor.settings().url(&format!(
            "{}/services/hostedservices/{}/deploymentslots/{}/?comp=config",
            self.subscription_id,
            service,
            slot.to_lowercase()
        ));

        let serialized = document::to_bytes(configuration, false)?;
        let serialized = String::from_utf8(serialized)
            .map_err(|e| MgmtError::protocol("ServiceConfiguration", e.to_string()))?;

        let namespace = self.namespace();
        let mut body = document::root_element("ChangeConfiguration", namespace);
        body.children.push(XMLNode::Element(document::text_element(
            "Configuration",
            namespace,
            &encoding::to_base64(&serialized),
        )));

        let response = self
            .executor
            .execute(&uri, Method::POST, StatusCode::ACCEPTED, Some(&body))
            .await?;
        info!(
            "Change Deployment Configuration accepted for {} ({}): {}",
            service, slot, response.request_id
        );
        Ok(response.request_id)
    }

    /// Swap the staging deployment into production
    #[instrument(skip(self))]
    pub async fn swap(&self, service: &str) -> Result<SwapOutcome> {
        let names = self.properties(service).await?.deployment_names();
        let staging = match &names.staging {
            Some(staging) => staging.clone(),
            None => {
                info!("There is nothing in the staging slot of {}", service);
                return Ok(SwapOutcome::NothingStaged);
            }
        };

        let namespace = self.namespace();
        let mut body = document::root_element("Swap", namespace);
        body.children.push(XMLNode::Element(document::text_element(
            "Production",
            namespace,
            names.production.as_deref().unwrap_or(""),
        )));
        body.children.push(XMLNode::Element(document::text_element(
            "SourceDeployment",
            namespace,
            &staging,
        )));

        let uri = self.service_uri(service);
        let response = self
            .executor
            .execute(&uri, Method::POST, StatusCode::ACCEPTED, Some(&body))
            .await?;
        info!("Swap accepted for {}: {}", service, response.request_id);

        Ok(SwapOutcome::Accepted {
            request_id: response.request_id,
            names,
        })
    }
}
