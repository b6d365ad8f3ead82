//! Host configuration types deserialized from `kiln.toml`.

use kiln_common::{TargetPlatform, UnitIdentity};
use serde::Deserialize;

use crate::error::ConfigError;

/// The top-level host configuration parsed from `kiln.toml`.
///
/// Describes the application being hosted, the target platform to resolve
/// and compile for, the ordered search directories consulted by unit
/// providers, and the file-watch/reload behavior.
#[derive(Debug, Deserialize)]
pub struct HostConfig {
    /// Application metadata and the root unit reference.
    pub application: ApplicationConfig,
    /// Target platform selection.
    pub platform: PlatformConfig,
    /// Provider search directories.
    #[serde(default)]
    pub search: SearchConfig,
    /// File watching and reload settings.
    #[serde(default)]
    pub watch: WatchConfig,
}

/// Application metadata required in every `kiln.toml`.
#[derive(Debug, Deserialize)]
pub struct ApplicationConfig {
    /// The application name.
    pub name: String,
    /// The application version string.
    #[serde(default)]
    pub version: String,
    /// The root unit reference (`Name@Version`). Absent means no root unit
    /// is configured and entry-point requests return nothing.
    #[serde(default)]
    pub root: Option<String>,
}

/// Target platform selection.
#[derive(Debug, Deserialize)]
pub struct PlatformConfig {
    /// The target platform descriptor (e.g. `net-x`).
    pub target: String,
}

/// Ordered provider search directories, relative to the project root.
///
/// Local build units are consulted before prebuilt packages, matching the
/// provider registration order in the resolver.
#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    /// Directories scanned for local source units (`<dir>/<name>/unit.toml`).
    #[serde(default = "default_unit_dirs")]
    pub unit_dirs: Vec<String>,
    /// Directories scanned for prebuilt packages.
    #[serde(default = "default_package_dirs")]
    pub package_dirs: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            unit_dirs: default_unit_dirs(),
            package_dirs: default_package_dirs(),
        }
    }
}

fn default_unit_dirs() -> Vec<String> {
    vec!["units".to_string()]
}

fn default_package_dirs() -> Vec<String> {
    vec!["packages".to_string()]
}

/// File watching and reload settings.
#[derive(Debug, Deserialize)]
pub struct WatchConfig {
    /// Whether source changes trigger a reload. When disabled a no-op
    /// notifier is installed and no event ever fires.
    #[serde(default = "default_watch_enabled")]
    pub enabled: bool,
    /// Polling cadence of the change notifier, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Whether a change-triggered shutdown waits for a debugger to attach
    /// before the process exits.
    #[serde(default)]
    pub wait_for_debugger: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enabled: default_watch_enabled(),
            poll_interval_ms: default_poll_interval_ms(),
            wait_for_debugger: false,
        }
    }
}

fn default_watch_enabled() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    500
}

impl HostConfig {
    /// Returns the configured target platform descriptor.
    pub fn target_platform(&self) -> TargetPlatform {
        TargetPlatform::new(self.platform.target.as_str())
    }

    /// Parses the configured root unit reference, if any.
    pub fn root_identity(&self) -> Result<Option<UnitIdentity>, ConfigError> {
        match &self.application.root {
            None => Ok(None),
            Some(reference) => reference
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::InvalidReference(reference.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    #[test]
    fn defaults_applied() {
        let toml = r#"
[application]
name = "demo"

[platform]
target = "net-x"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.search.unit_dirs, vec!["units"]);
        assert_eq!(config.search.package_dirs, vec!["packages"]);
        assert!(config.watch.enabled);
        assert_eq!(config.watch.poll_interval_ms, 500);
        assert!(!config.watch.wait_for_debugger);
        assert!(config.application.root.is_none());
    }

    #[test]
    fn root_identity_parsed() {
        let toml = r#"
[application]
name = "demo"
root = "App@1.0"

[platform]
target = "net-x"
"#;
        let config = load_config_from_str(toml).unwrap();
        let root = config.root_identity().unwrap().unwrap();
        assert_eq!(root, UnitIdentity::new("App", "1.0"));
    }

    #[test]
    fn root_identity_absent() {
        let toml = r#"
[application]
name = "demo"

[platform]
target = "net-x"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert!(config.root_identity().unwrap().is_none());
    }

    #[test]
    fn invalid_root_reference_errors() {
        // Parsed without the loader's validation pass, so the malformed
        // reference surfaces from root_identity itself
        let config: HostConfig = toml::from_str(
            r#"
[application]
name = "demo"
root = "App"

[platform]
target = "net-x"
"#,
        )
        .unwrap();
        let err = config.root_identity().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidReference(_)));
    }

    #[test]
    fn target_platform_descriptor() {
        let toml = r#"
[application]
name = "demo"

[platform]
target = "net-x"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.target_platform().as_str(), "net-x");
    }
}
