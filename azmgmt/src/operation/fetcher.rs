use std::time::Duration;

use reqwest::{Method, StatusCode};
use tracing::debug;
use xmltree::Element;

use crate::constants::api;
use crate::errors::{MgmtError, Result};
use crate::http::RequestExecutor;

/// The `Operation` element returned by Get Operation Status
#[derive(Debug, Clone)]
pub struct StatusDocument {
    pub operation: Element,
    pub elapsed: Duration,
}

/// Calls Get Operation Status for a subscription and operation id
#[derive(Clone)]
pub struct OperationStatusFetcher {
    executor: RequestExecutor,
    path_template: String,
}

impl OperationStatusFetcher {
    pub fn new(executor: RequestExecutor) -> Self {
        Self::with_path_template(executor, api::OPERATION_STATUS_PATH)
    }

    /// `path_template` is resolved against the base URL after substituting
    /// `{subscription_id}` and `{operation_id}`
    pub fn with_path_template(executor: RequestExecutor, path_template: &str) -> Self {
        Self {
            executor,
            path_template: path_template.to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.executor.settings().namespace
    }

    pub fn status_uri(&self, subscription_id: &str, operation_id: &str) -> String {
        let path = self
            .path_template
            .replace("{subscription_id}", subscription_id)
            .replace("{operation_id}", operation_id);
        self.executor.settings().url(&path)
    }

    pub async fn fetch_status(
        &self,
        subscription_id: &str,
        operation_id: &str,
    ) -> Result<StatusDocument> {
        let uri = self.status_uri(subscription_id, operation_id);
        let response = self
            .executor
            .execute(&uri, Method::GET, StatusCode::OK, None)
            .await?;

        let root = response.body.ok_or_else(|| {
            MgmtError::protocol(uri.as_str(), "Get Operation Status returned an empty body")
        })?;

        let namespace = self.namespace();
        if root.name != "Operation" || root.namespace.as_deref() != Some(namespace) {
            return Err(MgmtError::protocol(
                uri.as_str(),
                format!(
                    "expected root element {{{}}}Operation, found {{{}}}{}",
                    namespace,
                    root.namespace.as_deref().unwrap_or(""),
                    root.name
                ),
            ));
        }

        debug!(
            "Fetched status of {} in {}ms",
            operation_id,
            response.elapsed.as_millis()
        );

        Ok(StatusDocument {
            operation: root,
            elapsed: response.elapsed,
        })
    }
}
