pub mod certificate;
pub mod config;
pub mod constants;
pub mod deployment;
pub mod document;
pub mod encoding;
pub mod errors;
pub mod http;
pub mod operation;

// Re-export commonly used types
pub use certificate::{CertificateStore, Credential};
pub use config::{Config, ConfigManager};
pub use deployment::HostedServiceClient;
pub use errors::MgmtError;
pub use http::{ApiSettings, RequestExecutor, ReqwestTransport};
pub use operation::{
    OperationPoller, OperationResult, OperationStatus, OperationStatusFetcher,
};
