//! Unit provider capabilities: where build units are located.

use std::path::{Path, PathBuf};

use kiln_common::{TargetPlatform, UnitIdentity};
use kiln_config::{load_manifest, MANIFEST_FILE};

/// The binary extension of compiled unit images.
pub const BINARY_EXT: &str = "kbin";

/// A unit successfully located by a provider.
#[derive(Debug, Clone)]
pub struct LocatedUnit {
    /// The identity the unit was located under.
    pub identity: UnitIdentity,
    /// The unit's declared references, in declaration order. Empty for
    /// prebuilt packages, whose references are baked into the image.
    pub references: Vec<UnitIdentity>,
    /// The physical location the unit was found at.
    pub path: PathBuf,
}

/// A capability that can locate build units for a target platform.
///
/// Providers are consulted in registration order — local build units first,
/// then external package providers — and the first provider to satisfy an
/// identity wins.
pub trait UnitProvider: Send + Sync {
    /// Attempts to locate a unit satisfying `identity` for `platform`.
    fn locate(&self, identity: &UnitIdentity, platform: &TargetPlatform) -> Option<LocatedUnit>;

    /// Returns the locations this provider would search for `identity` on
    /// `platform`, in search order. Used for unresolved-dependency reports.
    fn candidate_locations(
        &self,
        identity: &UnitIdentity,
        platform: &TargetPlatform,
    ) -> Vec<PathBuf>;
}

/// Locates local source units laid out as `<root>/<name>/unit.toml`.
///
/// A candidate satisfies an identity when its manifest parses, its name and
/// version match, and it supports the target platform. Any manifest problem
/// is fail-safe: the candidate simply does not satisfy the lookup.
pub struct DirectoryUnitProvider {
    roots: Vec<PathBuf>,
}

impl DirectoryUnitProvider {
    /// Creates a provider searching the given root directories in order.
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Returns the directory a unit named `name` would live in under `root`.
    fn unit_dir(root: &Path, name: &str) -> PathBuf {
        root.join(name)
    }
}

impl UnitProvider for DirectoryUnitProvider {
    fn locate(&self, identity: &UnitIdentity, platform: &TargetPlatform) -> Option<LocatedUnit> {
        for root in &self.roots {
            let dir = Self::unit_dir(root, &identity.name);
            let Ok(manifest) = load_manifest(&dir) else {
                continue;
            };
            if manifest.identity() != *identity || !manifest.supports_platform(platform) {
                continue;
            }
            let Ok(references) = manifest.references() else {
                continue;
            };
            return Some(LocatedUnit {
                identity: identity.clone(),
                references,
                path: dir,
            });
        }
        None
    }

    fn candidate_locations(
        &self,
        identity: &UnitIdentity,
        _platform: &TargetPlatform,
    ) -> Vec<PathBuf> {
        self.roots
            .iter()
            .map(|root| Self::unit_dir(root, &identity.name).join(MANIFEST_FILE))
            .collect()
    }
}

/// Locates prebuilt packages laid out as
/// `<root>/<name>/<version>/<platform>/<name>.kbin`, falling back to a
/// `neutral` platform directory for platform-agnostic images.
pub struct PackageProvider {
    roots: Vec<PathBuf>,
}

impl PackageProvider {
    /// Creates a provider searching the given package roots in order.
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// The platform directory name used for platform-agnostic images.
    pub const NEUTRAL_DIR: &'static str = "neutral";

    fn image_path(
        root: &Path,
        identity: &UnitIdentity,
        platform_dir: &str,
    ) -> PathBuf {
        root.join(&identity.name)
            .join(&identity.version)
            .join(platform_dir)
            .join(format!("{}.{BINARY_EXT}", identity.name))
    }
}

impl UnitProvider for PackageProvider {
    fn locate(&self, identity: &UnitIdentity, platform: &TargetPlatform) -> Option<LocatedUnit> {
        for root in &self.roots {
            for platform_dir in [platform.as_str(), Self::NEUTRAL_DIR] {
                let path = Self::image_path(root, identity, platform_dir);
                if path.is_file() {
                    return Some(LocatedUnit {
                        identity: identity.clone(),
                        references: Vec::new(),
                        path,
                    });
                }
            }
        }
        None
    }

    fn candidate_locations(
        &self,
        identity: &UnitIdentity,
        platform: &TargetPlatform,
    ) -> Vec<PathBuf> {
        let mut locations = Vec::new();
        for root in &self.roots {
            locations.push(Self::image_path(root, identity, platform.as_str()));
            locations.push(Self::image_path(root, identity, Self::NEUTRAL_DIR));
        }
        locations
    }
}
