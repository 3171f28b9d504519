//! Default values for the management API client
//!
//! These are defaults only. Everything that reaches the wire is threaded through
//! [`crate::http::ApiSettings`] or [`crate::config::Config`] at construction time,
//! so two clients with different API versions can live in the same process.

use std::time::Duration;

/// Service Management REST API defaults
pub mod api {
    /// Management endpoint all request paths are resolved against
    pub const DEFAULT_BASE_URL: &str = "https://management.core.windows.net";

    /// Value sent in the `x-ms-version` header
    pub const DEFAULT_API_VERSION: &str = "2012-03-01";

    /// XML namespace every element of the management schema lives in
    pub const DEFAULT_NAMESPACE: &str = "http://schemas.microsoft.com/windowsazure";

    /// Namespace of the service configuration document carried inside a deployment
    pub const SERVICE_CONFIGURATION_NAMESPACE: &str =
        "http://schemas.microsoft.com/ServiceHosting/2008/10/ServiceConfiguration";

    /// Path template for Get Operation Status, relative to the base URL
    pub const OPERATION_STATUS_PATH: &str = "{subscription_id}/operations/{operation_id}";
}

/// Header names and media types
pub mod headers {
    pub const API_VERSION: &str = "x-ms-version";
    pub const REQUEST_ID: &str = "x-ms-request-id";
    pub const XML_MEDIA_TYPE: &str = "application/xml";
}

/// Polling defaults
pub mod polling {
    use super::Duration;

    /// Interval between calls to Get Operation Status
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

    /// Maximum time to poll before reporting a timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
}

/// Certificate store defaults
pub mod certificates {
    /// File pattern scanned in every certificate location
    pub const FILE_PATTERN: &str = "*.pem";
}
