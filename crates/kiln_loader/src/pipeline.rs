//! The loader pipeline: variants tried in order until one accepts.

use std::sync::Arc;

use kiln_assemble::Payload;
use kiln_compile::{decode_image, CompilationResult};
use kiln_diagnostics::{DiagnosticRenderer, TextRenderer};

use crate::module::{LoadedModule, ModuleTable};

/// The discriminated outcome of one load attempt.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The payload became a runnable in-process module.
    Loaded(Arc<LoadedModule>),
    /// The payload did not load; the strings are the full, ordered error
    /// lines (rendered diagnostics, or a loader rejection).
    Failed(Vec<String>),
}

impl LoadOutcome {
    /// Returns the loaded module handle, if the load succeeded.
    pub fn module(&self) -> Option<&Arc<LoadedModule>> {
        match self {
            LoadOutcome::Loaded(module) => Some(module),
            LoadOutcome::Failed(_) => None,
        }
    }

    /// Returns the error lines, if the load failed.
    pub fn errors(&self) -> Option<&[String]> {
        match self {
            LoadOutcome::Loaded(_) => None,
            LoadOutcome::Failed(errors) => Some(errors),
        }
    }
}

/// Accepts well-formed kiln unit images, validating the container header.
pub struct ImageLoader;

impl ImageLoader {
    fn try_load(&self, result: &CompilationResult, payload: &Payload) -> Option<LoadedModule> {
        let (header, _) = decode_image(&payload.binary)?;
        if header.unit_name != result.identity.name {
            return None;
        }
        Some(LoadedModule {
            name: result.identity.name.clone(),
            image_size: payload.binary.len(),
            has_symbols: result.symbols.is_some(),
            resource_names: payload.resources.iter().map(|r| r.name.clone()).collect(),
        })
    }
}

/// Accepts any non-empty opaque binary — prebuilt payloads that carry no
/// kiln container header.
pub struct RawLoader;

impl RawLoader {
    fn try_load(&self, result: &CompilationResult, payload: &Payload) -> Option<LoadedModule> {
        if payload.binary.is_empty() {
            return None;
        }
        Some(LoadedModule {
            name: result.identity.name.clone(),
            image_size: payload.binary.len(),
            has_symbols: result.symbols.is_some(),
            resource_names: payload.resources.iter().map(|r| r.name.clone()).collect(),
        })
    }
}

/// One loader implementation in the pipeline's ordered list.
///
/// A tagged list of variants, tried in registration order until one returns
/// a module — deliberately not trait-object dispatch, so the set of loaders
/// is closed and their order is explicit at the call site.
pub enum LoaderVariant {
    /// Validated kiln image loading.
    Image(ImageLoader),
    /// Opaque binary loading.
    Raw(RawLoader),
}

impl LoaderVariant {
    fn try_load(&self, result: &CompilationResult, payload: &Payload) -> Option<LoadedModule> {
        match self {
            LoaderVariant::Image(loader) => loader.try_load(result, payload),
            LoaderVariant::Raw(loader) => loader.try_load(result, payload),
        }
    }
}

/// Turns assembled payloads into runnable in-process modules.
///
/// A compilation result carrying failing diagnostics short-circuits to the
/// error outcome with every diagnostic rendered in compiler order — no
/// loader variant runs in that case, even when a binary is present.
pub struct LoaderPipeline {
    loaders: Vec<LoaderVariant>,
    table: Arc<ModuleTable>,
}

impl LoaderPipeline {
    /// Creates a pipeline over an explicit loader list.
    pub fn new(loaders: Vec<LoaderVariant>, table: Arc<ModuleTable>) -> Self {
        Self { loaders, table }
    }

    /// Creates the standard pipeline: image loading first, raw fallback.
    pub fn with_default_loaders(table: Arc<ModuleTable>) -> Self {
        Self::new(
            vec![
                LoaderVariant::Image(ImageLoader),
                LoaderVariant::Raw(RawLoader),
            ],
            table,
        )
    }

    /// Loads `payload` for the unit `result` was compiled from.
    pub fn load(&self, result: &CompilationResult, payload: &Payload) -> LoadOutcome {
        if result.has_errors() {
            let renderer = TextRenderer::new();
            return LoadOutcome::Failed(
                result
                    .diagnostics
                    .iter()
                    .map(|d| renderer.render(d))
                    .collect(),
            );
        }

        for loader in &self.loaders {
            if let Some(module) = loader.try_load(result, payload) {
                return LoadOutcome::Loaded(self.table.install(module));
            }
        }

        LoadOutcome::Failed(vec![format!(
            "no loader accepted module '{}'",
            result.identity.name
        )])
    }

    /// Returns the module table this pipeline installs into.
    pub fn table(&self) -> &ModuleTable {
        &self.table
    }
}
