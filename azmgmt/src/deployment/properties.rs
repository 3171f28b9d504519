use serde::Serialize;
use xmltree::Element;

use crate::document;
use crate::encoding;
use crate::errors::{MgmtError, Result};

/// Names of the deployments occupying the two slots of a hosted service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeploymentNames {
    pub production: Option<String>,
    pub staging: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputEndpoint {
    pub vip: String,
    pub port: String,
}

/// Get Hosted Service Properties response (`embed-detail=true`)
#[derive(Debug, Clone)]
pub struct HostedService {
    pub request_id: String,
    pub root: Element,
    namespace: String,
}

impl HostedService {
    pub fn new(request_id: String, root: Element, namespace: &str) -> Self {
        Self {
            request_id,
            root,
            namespace: namespace.to_string(),
        }
    }

    fn deployments(&self) -> Vec<&Element> {
        document::descendants(&self.root, "Deployment", &self.namespace)
    }

    fn deployment_in_slot(&self, slot: &str) -> Option<&Element> {
        self.deployments().into_iter().find(|deployment| {
            document::child(deployment, "DeploymentSlot", &self.namespace)
                .map(|s| document::text(s).eq_ignore_ascii_case(slot))
                .unwrap_or(false)
        })
    }

    pub fn deployment_names(&self) -> DeploymentNames {
        let name_in = |slot: &str| {
            self.deployment_in_slot(slot)
                .and_then(|d| document::child(d, "Name", &self.namespace))
                .map(document::text)
                .filter(|name| !name.is_empty())
        };

        DeploymentNames {
            production: name_in("Production"),
            staging: name_in("Staging"),
        }
    }

    /// Decoded service configuration of the deployment in `slot`
    pub fn slot_configuration(&self, slot: &str) -> Result<String> {
        let deployment = self.deployment_in_slot(slot).ok_or_else(|| {
            MgmtError::protocol(
                "HostedService",
                format!("no deployment in slot '{}'", slot),
            )
        })?;
        let encoded = document::required_text(deployment, "Configuration", &self.namespace)?;
        encoding::from_base64(&encoded)
    }

    pub fn input_endpoints(&self) -> Result<Vec<InputEndpoint>> {
        document::descendants(&self.root, "InputEndpoint", &self.namespace)
            .into_iter()
            .map(|endpoint| {
                Ok(InputEndpoint {
                    vip: document::required_text(endpoint, "Vip", &self.namespace)?,
                    port: document::required_text(endpoint, "Port", &self.namespace)?,
                })
            })
            .collect()
    }
}
