//! Configuration file loading and validation.

use std::path::Path;

use crate::error::ConfigError;
use crate::manifest::UnitManifest;
use crate::types::HostConfig;
use crate::{CONFIG_FILE, MANIFEST_FILE};

/// Loads and validates a `kiln.toml` host configuration from a project
/// directory.
pub fn load_config(project_dir: &Path) -> Result<HostConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `kiln.toml` host configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<HostConfig, ConfigError> {
    let config: HostConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Loads and validates a `unit.toml` manifest from a unit directory.
pub fn load_manifest(unit_dir: &Path) -> Result<UnitManifest, ConfigError> {
    let manifest_path = unit_dir.join(MANIFEST_FILE);
    let content = std::fs::read_to_string(&manifest_path)?;
    load_manifest_from_str(&content)
}

/// Parses and validates a `unit.toml` manifest from a string.
pub fn load_manifest_from_str(content: &str) -> Result<UnitManifest, ConfigError> {
    let manifest: UnitManifest =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_manifest(&manifest)?;
    Ok(manifest)
}

/// Validates that required host configuration fields are present.
fn validate_config(config: &HostConfig) -> Result<(), ConfigError> {
    if config.application.name.is_empty() {
        return Err(ConfigError::MissingField("application.name".to_string()));
    }
    if config.platform.target.is_empty() {
        return Err(ConfigError::MissingField("platform.target".to_string()));
    }
    // Fail early on a malformed root reference rather than at resolve time
    config.root_identity()?;
    Ok(())
}

/// Validates that required manifest fields are present.
fn validate_manifest(manifest: &UnitManifest) -> Result<(), ConfigError> {
    if manifest.unit.name.is_empty() {
        return Err(ConfigError::MissingField("unit.name".to_string()));
    }
    if manifest.unit.version.is_empty() {
        return Err(ConfigError::MissingField("unit.version".to_string()));
    }
    Ok(())
}
