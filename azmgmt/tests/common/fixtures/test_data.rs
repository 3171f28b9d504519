//! Common test data and constants

use azmgmt::encoding::to_base64;

pub const NAMESPACE: &str = "http://schemas.microsoft.com/windowsazure";
pub const API_VERSION: &str = "2012-03-01";

/// Common subscription ids
pub mod subscriptions {
    pub const DEFAULT: &str = "0f3b2c4e-1111-4a2b-9c3d-5e6f7a8b9c0d";
    pub const OTHER: &str = "7d1e9a0b-2222-4c3d-8e4f-6a7b8c9d0e1f";
}

/// Common operation (request) ids
pub mod operations {
    pub const SWAP: &str = "4f1d0c1e9e8b4b53a8b3e0a7c2d1f6e5";
    pub const CHANGE_CONFIG: &str = "9a8b7c6d5e4f40318273645546372819";
}

/// Common hosted service names
pub mod services {
    pub const PORTAL: &str = "dev-portal";
}

/// `<Operation>` body with only a status (in-progress or malformed statuses)
pub fn status_xml(status: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<Operation xmlns="{}">
  <ID>{}</ID>
  <Status>{}</Status>
</Operation>"#,
        NAMESPACE,
        operations::SWAP,
        status
    )
}

pub fn in_progress_xml() -> String {
    status_xml("InProgress")
}

pub fn succeeded_xml(http_status: u16) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<Operation xmlns="{}">
  <ID>{}</ID>
  <Status>Succeeded</Status>
  <HttpStatusCode>{}</HttpStatusCode>
</Operation>"#,
        NAMESPACE,
        operations::SWAP,
        http_status
    )
}

pub fn failed_xml(http_status: u16, code: &str, message: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<Operation xmlns="{}">
  <ID>{}</ID>
  <Status>Failed</Status>
  <HttpStatusCode>{}</HttpStatusCode>
  <Error>
    <Code>{}</Code>
    <Message>{}</Message>
  </Error>
</Operation>"#,
        NAMESPACE,
        operations::SWAP,
        http_status,
        code,
        message
    )
}

/// Error body the service sends with 4xx/5xx responses
pub fn error_xml(code: &str, message: &str) -> String {
    format!(
        r#"<Error xmlns="{}"><Code>{}</Code><Message>{}</Message></Error>"#,
        NAMESPACE, code, message
    )
}

pub const SERVICE_CONFIGURATION: &str = r#"<ServiceConfiguration serviceName="dev-portal" xmlns="http://schemas.microsoft.com/ServiceHosting/2008/10/ServiceConfiguration">
  <Role name="Web">
    <Instances count="2" />
    <ConfigurationSettings>
      <Setting name="OperationalState" value="off" />
      <Setting name="AggregatorEnabled" value="false" />
    </ConfigurationSettings>
  </Role>
</ServiceConfiguration>"#;

/// Get Hosted Service Properties body; `staging` is omitted when `None`
pub fn hosted_service_xml(production: &str, staging: Option<&str>) -> String {
    let staging = staging
        .map(|name| {
            format!(
                "<Deployment><Name>{}</Name><DeploymentSlot>Staging</DeploymentSlot><Configuration>{}</Configuration></Deployment>",
                name,
                to_base64(SERVICE_CONFIGURATION)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<HostedService xmlns="{}">
  <ServiceName>{}</ServiceName>
  <Deployments>
    <Deployment>
      <Name>{}</Name>
      <DeploymentSlot>Production</DeploymentSlot>
      <Configuration>{}</Configuration>
      <RoleList>
        <Role>
          <ConfigurationSets>
            <ConfigurationSet>
              <InputEndpoints>
                <InputEndpoint><Port>443</Port><Vip>168.62.1.10</Vip></InputEndpoint>
              </InputEndpoints>
            </ConfigurationSet>
          </ConfigurationSets>
        </Role>
      </RoleList>
    </Deployment>
    {}
  </Deployments>
</HostedService>"#,
        NAMESPACE,
        services::PORTAL,
        production,
        to_base64(SERVICE_CONFIGURATION),
        staging
    )
}
