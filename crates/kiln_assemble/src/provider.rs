//! Resource provider capabilities and their ordered composition.

use std::path::{Path, PathBuf};

use kiln_config::UnitManifest;

use crate::resource::ResourceDescriptor;

/// A capability that supplies resources for a unit's payload.
///
/// Providers compose in registration order; ordering matters for collision
/// resolution (see [`CompositeResourceProvider`]).
pub trait ResourceProvider: Send + Sync {
    /// Returns this provider's resources for the unit, in declaration order.
    fn resources(&self) -> Vec<ResourceDescriptor>;
}

/// Supplies one `<unit>.strings` resource rendered from a structured
/// string-table file (flat TOML key/value pairs).
///
/// Rendering is deterministic: entries are sorted by key and emitted as
/// `key=value` lines. A missing or malformed table file is fail-safe and
/// yields no resources.
pub struct StringTableProvider {
    unit_name: String,
    table_path: PathBuf,
}

impl StringTableProvider {
    /// Creates a provider over the given string-table file.
    pub fn new(unit_name: impl Into<String>, table_path: impl Into<PathBuf>) -> Self {
        Self {
            unit_name: unit_name.into(),
            table_path: table_path.into(),
        }
    }

    fn render(&self) -> Option<Vec<u8>> {
        let content = std::fs::read_to_string(&self.table_path).ok()?;
        let table: toml::Table = content.parse().ok()?;

        let mut entries: Vec<(String, String)> = table
            .into_iter()
            .filter_map(|(key, value)| match value {
                toml::Value::String(s) => Some((key, s)),
                _ => None,
            })
            .collect();
        entries.sort();

        let mut out = String::new();
        for (key, value) in entries {
            out.push_str(&key);
            out.push('=');
            out.push_str(&value);
            out.push('\n');
        }
        Some(out.into_bytes())
    }
}

impl ResourceProvider for StringTableProvider {
    fn resources(&self) -> Vec<ResourceDescriptor> {
        match self.render() {
            Some(bytes) => vec![ResourceDescriptor::inline(
                format!("{}.strings", self.unit_name),
                bytes,
            )],
            None => Vec::new(),
        }
    }
}

/// Supplies one lazily-read resource per embedded file.
///
/// Each file becomes a resource named `<unit>.<file-name>`; the bytes stay
/// on disk until the payload consumer reads them.
pub struct EmbeddedFileProvider {
    unit_name: String,
    files: Vec<PathBuf>,
}

impl EmbeddedFileProvider {
    /// Creates a provider over the given files.
    pub fn new(unit_name: impl Into<String>, files: Vec<PathBuf>) -> Self {
        Self {
            unit_name: unit_name.into(),
            files,
        }
    }
}

impl ResourceProvider for EmbeddedFileProvider {
    fn resources(&self) -> Vec<ResourceDescriptor> {
        self.files
            .iter()
            .filter_map(|path| {
                let file_name = path.file_name()?.to_str()?;
                Some(ResourceDescriptor::file(
                    format!("{}.{file_name}", self.unit_name),
                    path.clone(),
                ))
            })
            .collect()
    }
}

/// Ordered composition of resource providers.
///
/// Providers contribute in registration order. When two providers supply a
/// resource with the same logical name, the **last-registered provider
/// wins** — the earlier descriptor is replaced in place, keeping its
/// position. This precedence is deliberate and fixed; relying on any other
/// collision behavior is a bug in the caller.
pub struct CompositeResourceProvider {
    providers: Vec<Box<dyn ResourceProvider>>,
}

impl CompositeResourceProvider {
    /// Creates an empty composition.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Registers a provider after all previously registered ones.
    pub fn register(mut self, provider: Box<dyn ResourceProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Builds the standard composition for a unit directory and manifest:
    /// the string-table provider first, then the embedded-file provider, so
    /// an embedded file can deliberately shadow a generated string table.
    pub fn for_unit(unit_dir: &Path, manifest: &UnitManifest) -> Self {
        let mut composite = Self::new();
        if let Some(strings) = &manifest.resources.strings {
            composite = composite.register(Box::new(StringTableProvider::new(
                manifest.unit.name.as_str(),
                unit_dir.join(strings),
            )));
        }
        let embedded: Vec<PathBuf> = manifest
            .resources
            .embed
            .iter()
            .map(|f| unit_dir.join(f))
            .collect();
        if !embedded.is_empty() {
            composite = composite.register(Box::new(EmbeddedFileProvider::new(
                manifest.unit.name.as_str(),
                embedded,
            )));
        }
        composite
    }
}

impl Default for CompositeResourceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceProvider for CompositeResourceProvider {
    fn resources(&self) -> Vec<ResourceDescriptor> {
        let mut combined: Vec<ResourceDescriptor> = Vec::new();
        for provider in &self.providers {
            for descriptor in provider.resources() {
                match combined.iter_mut().find(|r| r.name == descriptor.name) {
                    Some(existing) => *existing = descriptor,
                    None => combined.push(descriptor),
                }
            }
        }
        combined
    }
}
