//! Unit manifest types deserialized from `unit.toml`.

use kiln_common::{TargetPlatform, UnitIdentity};
use serde::Deserialize;

use crate::error::ConfigError;

/// A build unit manifest parsed from `unit.toml`.
///
/// Declares the unit's identity, the target platforms it supports, the
/// sources packaged into its image, its ordered references, and the
/// resources embedded into its payload.
#[derive(Debug, Deserialize)]
pub struct UnitManifest {
    /// Unit identity and platform constraints.
    pub unit: UnitMeta,
    /// Sources and declared references.
    #[serde(default)]
    pub build: BuildSection,
    /// Resource declarations.
    #[serde(default)]
    pub resources: ResourceSection,
}

/// Identity and platform metadata required in every `unit.toml`.
#[derive(Debug, Deserialize)]
pub struct UnitMeta {
    /// The unit name.
    pub name: String,
    /// The unit version string.
    pub version: String,
    /// Target platforms this unit supports. Empty means any platform.
    #[serde(default)]
    pub platforms: Vec<String>,
    /// Whether compiling this unit additionally emits a platform-neutral
    /// reference artifact for embedding into dependent payloads.
    #[serde(default)]
    pub neutral: bool,
}

/// Sources and ordered references of a unit.
#[derive(Debug, Default, Deserialize)]
pub struct BuildSection {
    /// Source files packaged into the unit image, relative to the unit
    /// directory.
    #[serde(default)]
    pub sources: Vec<String>,
    /// Declared references in `Name@Version` form. Order is preserved
    /// through resolution and compilation.
    #[serde(default)]
    pub references: Vec<String>,
}

/// Resource declarations of a unit.
#[derive(Debug, Default, Deserialize)]
pub struct ResourceSection {
    /// Path to a structured string-table file (TOML key/value pairs),
    /// relative to the unit directory.
    #[serde(default)]
    pub strings: Option<String>,
    /// Arbitrary files embedded into the payload, relative to the unit
    /// directory.
    #[serde(default)]
    pub embed: Vec<String>,
}

impl UnitManifest {
    /// Returns the unit's identity.
    pub fn identity(&self) -> UnitIdentity {
        UnitIdentity::new(self.unit.name.as_str(), self.unit.version.as_str())
    }

    /// Parses the declared references, preserving declaration order.
    pub fn references(&self) -> Result<Vec<UnitIdentity>, ConfigError> {
        self.build
            .references
            .iter()
            .map(|r| {
                r.parse()
                    .map_err(|_| ConfigError::InvalidReference(r.clone()))
            })
            .collect()
    }

    /// Returns `true` if this unit can be built for the given platform.
    ///
    /// An empty `platforms` list means the unit is platform-agnostic.
    pub fn supports_platform(&self, platform: &TargetPlatform) -> bool {
        self.unit.platforms.is_empty()
            || self.unit.platforms.iter().any(|p| p == platform.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_manifest_from_str;

    #[test]
    fn parse_minimal_manifest() {
        let toml = r#"
[unit]
name = "Lib"
version = "1.0"
"#;
        let manifest = load_manifest_from_str(toml).unwrap();
        assert_eq!(manifest.identity(), UnitIdentity::new("Lib", "1.0"));
        assert!(manifest.build.sources.is_empty());
        assert!(manifest.references().unwrap().is_empty());
        assert!(!manifest.unit.neutral);
    }

    #[test]
    fn parse_full_manifest() {
        let toml = r#"
[unit]
name = "App"
version = "1.0"
platforms = ["net-x"]
neutral = true

[build]
sources = ["main.ks", "util.ks"]
references = ["Lib@1.0", "Core@2.1"]

[resources]
strings = "strings.toml"
embed = ["data/banner.txt"]
"#;
        let manifest = load_manifest_from_str(toml).unwrap();
        assert_eq!(manifest.build.sources.len(), 2);
        assert_eq!(
            manifest.references().unwrap(),
            vec![
                UnitIdentity::new("Lib", "1.0"),
                UnitIdentity::new("Core", "2.1"),
            ]
        );
        assert!(manifest.unit.neutral);
        assert_eq!(manifest.resources.strings.as_deref(), Some("strings.toml"));
        assert_eq!(manifest.resources.embed, vec!["data/banner.txt"]);
    }

    #[test]
    fn platform_filtering() {
        let toml = r#"
[unit]
name = "Lib"
version = "1.0"
platforms = ["net-x", "net-y"]
"#;
        let manifest = load_manifest_from_str(toml).unwrap();
        assert!(manifest.supports_platform(&TargetPlatform::new("net-x")));
        assert!(manifest.supports_platform(&TargetPlatform::new("net-y")));
        assert!(!manifest.supports_platform(&TargetPlatform::new("net-z")));
    }

    #[test]
    fn empty_platforms_means_any() {
        let toml = r#"
[unit]
name = "Lib"
version = "1.0"
"#;
        let manifest = load_manifest_from_str(toml).unwrap();
        assert!(manifest.supports_platform(&TargetPlatform::new("anything")));
    }

    #[test]
    fn invalid_reference_errors() {
        let toml = r#"
[unit]
name = "App"
version = "1.0"

[build]
references = ["NotAReference"]
"#;
        let manifest = load_manifest_from_str(toml).unwrap();
        let err = manifest.references().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidReference(_)));
    }

    #[test]
    fn reference_order_preserved() {
        let toml = r#"
[unit]
name = "App"
version = "1.0"

[build]
references = ["Zeta@1.0", "Alpha@1.0"]
"#;
        let manifest = load_manifest_from_str(toml).unwrap();
        let refs = manifest.references().unwrap();
        assert_eq!(refs[0].name, "Zeta");
        assert_eq!(refs[1].name, "Alpha");
    }
}
