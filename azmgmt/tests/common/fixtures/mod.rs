//! This module provides reusable test utilities:
//! - A scripted in-memory transport that counts response handles
//! - A mock management endpoint (wiremock)
//! - Common status and service documents

// Allow unused code in test fixtures - not every test binary uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod fake_transport;
pub mod mock_management;
pub mod test_data;

// Re-export commonly used items
pub use fake_transport::{FakeResponse, FakeTransport};
pub use mock_management::MockManagementServer;
pub use test_data::*;
