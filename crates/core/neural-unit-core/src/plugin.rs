//! Plugin surface for host integrations

use crate::{Result, UnitError};
use std::collections::HashMap;

/// A host-side component that can be registered with an integration
pub trait Plugin: Send + Sync {
    /// Plugin name (unique identifier)
    fn name(&self) -> &str;

    /// Plugin description
    fn description(&self) -> &str;

    /// Initialize plugin with string settings
    fn init(&self, _config: HashMap<String, String>) -> Result<()> {
        Ok(())
    }
}

/// Validate a plugin's structure
pub fn validate_plugin(plugin: &dyn Plugin) -> Result<()> {
    let mut errors = Vec::new();

    if plugin.name().is_empty() {
        errors.push("Plugin must have a name".to_string());
    }

    if plugin.description().is_empty() {
        errors.push("Plugin should have a description".to_string());
    }

    if !errors.is_empty() {
        return Err(UnitError::config(format!(
            "Plugin validation failed: {}",
            errors.join(", ")
        )));
    }

    Ok(())
}
