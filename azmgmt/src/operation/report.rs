use std::time::Duration;

use reqwest::StatusCode;

use super::status::{OperationResult, OperationStatus};

/// Render a duration as `hh:mm:ss`
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

fn format_status_code(code: Option<StatusCode>) -> String {
    match code {
        Some(code) => format!(
            "{} ({})",
            code.as_u16(),
            code.canonical_reason().unwrap_or("Unknown")
        ),
        None => "unknown".to_string(),
    }
}

/// One-line summary of a finished poll
pub fn format_result(result: &OperationResult, operation_id: &str) -> String {
    let elapsed = format_elapsed(result.elapsed);
    match result.status {
        OperationStatus::InProgress => format!("In progress for: {}", elapsed),
        OperationStatus::TimedOut => format!(
            "Poll of Get Operation Status timed out: Operation {} is still in progress after {}.",
            operation_id, elapsed
        ),
        OperationStatus::Failed => {
            let (code, message) = result
                .failure
                .as_ref()
                .map(|f| (f.code.as_str(), f.message.as_str()))
                .unwrap_or(("", ""));
            format!(
                "Failed: Operation {} failed after {} with status {} - {}: {}",
                operation_id,
                elapsed,
                format_status_code(result.status_code),
                code,
                message
            )
        }
        OperationStatus::Succeeded => format!(
            "Succeeded: Operation {} completed after {} with status {}",
            operation_id,
            elapsed,
            format_status_code(result.status_code)
        ),
    }
}
