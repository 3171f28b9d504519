//! Deadline-bounded polling of Get Operation Status
//!
//! The deadline is only consulted after sleeping, so it is honoured at the
//! granularity of the poll interval: an interval longer than the timeout still
//! performs exactly one status check before reporting `TimedOut`.

use std::time::Duration;

use chrono::Utc;
use reqwest::StatusCode;
use tokio::time::{sleep, Instant};
use tracing::{info, instrument};
use xmltree::Element;

use super::fetcher::OperationStatusFetcher;
use super::report::format_elapsed;
use super::status::{OperationFailure, OperationResult, OperationStatus};
use crate::document::{self, Document};
use crate::errors::{MgmtError, Result};

pub struct OperationPoller {
    fetcher: OperationStatusFetcher,
    subscription_id: String,
}

impl OperationPoller {
    pub fn new(fetcher: OperationStatusFetcher, subscription_id: impl Into<String>) -> Self {
        Self {
            fetcher,
            subscription_id: subscription_id.into(),
        }
    }

    /// Integer-seconds form of [`OperationPoller::poll`]
    pub async fn poll_secs(
        &self,
        operation_id: &str,
        poll_interval_secs: u64,
        timeout_secs: u64,
    ) -> Result<OperationResult> {
        self.poll(
            operation_id,
            Duration::from_secs(poll_interval_secs),
            Duration::from_secs(timeout_secs),
        )
        .await
    }

    /// Poll every `poll_interval` until the operation finishes or `timeout` has passed
    #[instrument(skip(self), fields(subscription = %self.subscription_id))]
    pub async fn poll(
        &self,
        operation_id: &str,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<OperationResult> {
        let started_at = Utc::now();
        let begin = Instant::now();
        // A timeout too large to represent means there is no deadline
        let deadline = begin.checked_add(timeout);
        let namespace = self.fetcher.namespace().to_string();

        loop {
            let status_document = self
                .fetcher
                .fetch_status(&self.subscription_id, operation_id)
                .await?;
            let operation = status_document.operation;

            let status_text = document::required_text(&operation, "Status", &namespace)?;
            let status = status_text.parse::<OperationStatus>().map_err(|_| {
                MgmtError::UnexpectedStatus {
                    operation_id: operation_id.to_string(),
                    status: status_text.clone(),
                    document: Document::new(operation.clone()),
                }
            })?;

            match status {
                OperationStatus::InProgress => {
                    info!("In progress for: {}", format_elapsed(begin.elapsed()));
                    sleep(poll_interval).await;
                    if deadline.is_some_and(|deadline| Instant::now() > deadline) {
                        let elapsed = begin.elapsed();
                        info!(
                            "Operation {} still in progress after {}, giving up",
                            operation_id,
                            format_elapsed(elapsed)
                        );
                        return Ok(OperationResult::timed_out(elapsed, started_at));
                    }
                }
                OperationStatus::Succeeded => {
                    let status_code = http_status_code(&operation, &namespace)?;
                    let elapsed = begin.elapsed();
                    info!("Operation {} succeeded with {}", operation_id, status_code);
                    return Ok(OperationResult::succeeded(status_code, elapsed, started_at));
                }
                OperationStatus::Failed => {
                    let status_code = http_status_code(&operation, &namespace)?;
                    let error = document::required_child(&operation, "Error", &namespace)?;
                    let failure = OperationFailure {
                        code: document::required_text(error, "Code", &namespace)?,
                        message: document::required_text(error, "Message", &namespace)?,
                    };
                    let elapsed = begin.elapsed();
                    info!(
                        "Operation {} failed with {}: {}",
                        operation_id, status_code, failure.code
                    );
                    return Ok(OperationResult::failed(
                        status_code,
                        failure,
                        elapsed,
                        started_at,
                    ));
                }
                OperationStatus::TimedOut => {
                    return Err(MgmtError::UnexpectedStatus {
                        operation_id: operation_id.to_string(),
                        status: status_text,
                        document: Document::new(operation),
                    });
                }
            }
        }
    }
}

fn http_status_code(operation: &Element, namespace: &str) -> Result<StatusCode> {
    let text = document::required_text(operation, "HttpStatusCode", namespace)?;
    text.parse::<u16>()
        .ok()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .ok_or_else(|| {
            MgmtError::protocol(
                "<HttpStatusCode>",
                format!("'{}' is not an HTTP status code", text),
            )
        })
}
