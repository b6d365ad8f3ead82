//! Configuration for the Kiln build host.
//!
//! Two configuration surfaces live here: the host configuration parsed from
//! `kiln.toml` (application identity, target platform, search directories,
//! watch behavior) and the per-unit manifest parsed from `unit.toml`
//! (identity, sources, references, resources).

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod manifest;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, load_manifest, load_manifest_from_str};
pub use manifest::{BuildSection, ResourceSection, UnitManifest, UnitMeta};
pub use types::{ApplicationConfig, HostConfig, PlatformConfig, SearchConfig, WatchConfig};

/// The host configuration file name looked up at the project root.
pub const CONFIG_FILE: &str = "kiln.toml";

/// The per-unit manifest file name looked up inside each unit directory.
pub const MANIFEST_FILE: &str = "unit.toml";
