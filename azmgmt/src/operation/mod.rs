//! Tracking of asynchronous management operations
//!
//! Mutating calls answer `202 Accepted` with an `x-ms-request-id`. That id is
//! then polled through Get Operation Status:
//!
//! ```text
//! OperationPoller → OperationStatusFetcher → RequestExecutor → network
//!       |
//!  InProgress ──sleep(interval)──┐
//!       ↑                        │ deadline passed → TimedOut
//!       └────────────────────────┘
//!  Succeeded / Failed → OperationResult
//! ```

pub mod fetcher;
pub mod poller;
pub mod report;
pub mod status;

pub use fetcher::{OperationStatusFetcher, StatusDocument};
pub use poller::OperationPoller;
pub use report::{format_elapsed, format_result};
pub use status::{OperationFailure, OperationResult, OperationStatus, UnknownStatus};
