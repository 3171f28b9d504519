use tracing::{debug, warn};
use xmltree::Element;

use crate::config::SettingOverride;
use crate::constants::api::SERVICE_CONFIGURATION_NAMESPACE;
use crate::document;
use crate::errors::Result;

/// A service configuration with role settings rewritten
#[derive(Debug, Clone)]
pub struct EditedConfiguration {
    pub document: Element,
    /// Setting names that were found and rewritten
    pub updated: Vec<String>,
    /// Setting names that do not exist in the configuration and were skipped
    pub missing: Vec<String>,
}

/// Set the `value` of every `<Setting name="...">` named in `overrides`.
///
/// Settings are matched in every role of the configuration. Names that do not
/// occur are skipped rather than added.
pub fn apply_settings(configuration: &str, overrides: &[SettingOverride]) -> Result<EditedConfiguration> {
    let mut root = document::parse(configuration.as_bytes(), "ServiceConfiguration")?;
    let mut updated = Vec::new();
    let mut missing = Vec::new();

    for setting in overrides {
        let mut found = false;
        for element in document::descendants_mut(&mut root, "Setting", SERVICE_CONFIGURATION_NAMESPACE)
        {
            if element.attributes.get("name").map(String::as_str) == Some(setting.name.as_str()) {
                element
                    .attributes
                    .insert("value".to_string(), setting.value.clone());
                found = true;
            }
        }

        if found {
            debug!("Setting {} = {}", setting.name, setting.value);
            updated.push(setting.name.clone());
        } else {
            warn!("Setting {} not present in configuration, skipped", setting.name);
            missing.push(setting.name.clone());
        }
    }

    Ok(EditedConfiguration {
        document: root,
        updated,
        missing,
    })
}
