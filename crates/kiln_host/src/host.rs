//! The entry-point resolver state machine.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use kiln_assemble::{ArtifactAssembler, AssembleError, CompositeResourceProvider, Payload};
use kiln_common::{InternalError, TargetPlatform, UnitIdentity};
use kiln_compile::{CompilationCache, CompilationResult, ManifestCompiler};
use kiln_config::{load_manifest, HostConfig, MANIFEST_FILE};
use kiln_loader::{LoadOutcome, LoadedModule, LoaderPipeline, ModuleTable};
use kiln_resolve::{DirectoryUnitProvider, GraphResolver, PackageProvider, UnitProvider};

use crate::error::HostError;
use crate::report::{format_load_failure, format_unresolved_report};

/// Where the host is in its lifecycle.
///
/// `Ready` and `Failed` are terminal: a fresh host is required to run the
/// pipeline again, which is exactly what a reload-triggered restart does.
#[derive(Debug, PartialEq, Eq)]
pub enum HostState {
    /// Constructed, graph not walked yet.
    Uninitialized,
    /// The dependency graph has been resolved; compile/load pending.
    GraphWalked,
    /// The entry module is loaded and cached.
    Ready,
    /// Resolution, compilation, or loading failed; the failure block is
    /// available at the boundary.
    Failed,
}

/// Resolves a configured application to its loaded entry module.
///
/// Drives the pipeline: dependency resolution first, failing fast with the
/// formatted unresolved report; otherwise compile through the cache,
/// assemble the payload, and load. Every collaborator is injected at
/// construction.
pub struct Host {
    root: Option<UnitIdentity>,
    platform: TargetPlatform,
    resolver: GraphResolver,
    cache: CompilationCache,
    loader: LoaderPipeline,
    unit_roots: Vec<PathBuf>,
    state: HostState,
    failure: Option<HostError>,
    entry: Option<Arc<LoadedModule>>,
    entry_result: Option<Arc<CompilationResult>>,
}

impl Host {
    /// Creates a host over explicit collaborators.
    ///
    /// Fails with [`HostError::MissingRootProject`] when a root unit is
    /// configured but no provider can locate it — fatal at construction,
    /// before any graph walk.
    pub fn new(
        root: Option<UnitIdentity>,
        platform: TargetPlatform,
        resolver: GraphResolver,
        cache: CompilationCache,
        loader: LoaderPipeline,
        unit_roots: Vec<PathBuf>,
    ) -> Result<Self, HostError> {
        if let Some(root_identity) = &root {
            if resolver.locate(root_identity, &platform).is_none() {
                return Err(HostError::MissingRootProject(root_identity.clone()));
            }
        }
        Ok(Self {
            root,
            platform,
            resolver,
            cache,
            loader,
            unit_roots,
            state: HostState::Uninitialized,
            failure: None,
            entry: None,
            entry_result: None,
        })
    }

    /// Wires the default capabilities for a project directory: directory
    /// and package providers in that order, the manifest compiler, a fresh
    /// cache, and the standard loader pipeline.
    pub fn from_config(config: &HostConfig, project_dir: &Path) -> Result<Self, HostError> {
        let root = config
            .root_identity()
            .map_err(|e| HostError::Configuration(e.to_string()))?;
        let platform = config.target_platform();

        let unit_roots: Vec<PathBuf> = config
            .search
            .unit_dirs
            .iter()
            .map(|d| project_dir.join(d))
            .collect();
        let package_roots: Vec<PathBuf> = config
            .search
            .package_dirs
            .iter()
            .map(|d| project_dir.join(d))
            .collect();

        let providers: Vec<Box<dyn UnitProvider>> = vec![
            Box::new(DirectoryUnitProvider::new(unit_roots.clone())),
            Box::new(PackageProvider::new(package_roots)),
        ];
        let resolver = GraphResolver::new(providers);
        let cache = CompilationCache::new(Arc::new(ManifestCompiler::new(unit_roots.clone())));
        let loader = LoaderPipeline::with_default_loaders(Arc::new(ModuleTable::new()));

        Self::new(root, platform, resolver, cache, loader, unit_roots)
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> &HostState {
        &self.state
    }

    /// Returns the compilation cache (shared across entry-point requests
    /// until the process restarts).
    pub fn cache(&self) -> &CompilationCache {
        &self.cache
    }

    /// Returns the process module table.
    pub fn module_table(&self) -> &ModuleTable {
        self.loader.table()
    }

    /// Returns the cached compilation result behind the entry module.
    pub fn entry_result(&self) -> Option<Arc<CompilationResult>> {
        self.entry_result.clone()
    }

    /// Runs the pipeline to a terminal state.
    ///
    /// A host that already reached `Ready` or `Failed` stays there; a fresh
    /// host (after a restart) is required to re-enter the state machine.
    pub fn initialize(&mut self) {
        if self.state != HostState::Uninitialized {
            return;
        }

        let Some(root) = self.root.clone() else {
            // Nothing to resolve without a root unit
            self.state = HostState::Ready;
            return;
        };

        let resolution = self.resolver.resolve(&root, &self.platform);
        self.state = HostState::GraphWalked;

        if !resolution.is_fully_resolved() {
            self.fail(HostError::UnresolvedDependencies {
                report: format_unresolved_report(&resolution),
            });
            return;
        }

        let result = match self.cache.get_or_compile(&root, &self.platform) {
            Some(result) => result,
            // Not a compilable unit: fall through to its prebuilt image
            None => match self.load_prebuilt(&root) {
                Ok(result) => result,
                Err(error) => {
                    self.fail(error);
                    return;
                }
            },
        };

        let payload = if result.has_errors() {
            // The loader short-circuits on failing diagnostics before it
            // looks at any binary
            Payload {
                binary: Vec::new(),
                resources: Vec::new(),
            }
        } else {
            match self.assemble(&result) {
                Ok(payload) => payload,
                Err(error) => {
                    self.fail(HostError::LoadFailed {
                        report: format_load_failure(&root, &[error.to_string()]),
                    });
                    return;
                }
            }
        };

        match self.loader.load(&result, &payload) {
            LoadOutcome::Loaded(module) => {
                self.entry = Some(module);
                self.entry_result = Some(result);
                self.state = HostState::Ready;
            }
            LoadOutcome::Failed(errors) => {
                self.fail(HostError::LoadFailed {
                    report: format_load_failure(&root, &errors),
                });
            }
        }
    }

    /// The entry-point request boundary.
    ///
    /// Returns `Ok(None)` when no root unit is configured for
    /// `application_name`; otherwise initializes on first call and either
    /// hands back the loaded entry module or the failure block. Repeat
    /// calls on a ready host return the same cached module without
    /// recompiling.
    pub fn get_entry_point(
        &mut self,
        application_name: &str,
    ) -> Result<Option<Arc<LoadedModule>>, HostError> {
        let Some(root) = self.root.clone() else {
            return Ok(None);
        };
        if root.name != application_name {
            return Ok(None);
        }

        if self.state == HostState::Uninitialized {
            self.initialize();
        }

        match self.state {
            HostState::Ready => Ok(self.entry.clone()),
            _ => Err(self.failure.clone().unwrap_or_else(|| {
                HostError::Internal(InternalError::new(
                    "host reached a failed state without recording a failure",
                ))
            })),
        }
    }

    fn fail(&mut self, error: HostError) {
        self.failure = Some(error);
        self.state = HostState::Failed;
    }

    /// Builds the unit's resource composition from its manifest, when the
    /// root is a source unit; prebuilt roots get an empty composition.
    fn assemble(&self, result: &CompilationResult) -> Result<Payload, AssembleError> {
        let composite = self
            .unit_roots
            .iter()
            .map(|root| root.join(&result.identity.name))
            .find(|dir| dir.join(MANIFEST_FILE).is_file())
            .and_then(|dir| {
                load_manifest(&dir)
                    .ok()
                    .map(|manifest| CompositeResourceProvider::for_unit(&dir, &manifest))
            })
            .unwrap_or_default();

        ArtifactAssembler::new(composite).assemble(result)
    }

    /// Synthesizes a result for a root satisfied by a prebuilt package
    /// image rather than source compilation.
    fn load_prebuilt(&self, root: &UnitIdentity) -> Result<Arc<CompilationResult>, HostError> {
        let located = self
            .resolver
            .locate(root, &self.platform)
            .ok_or_else(|| HostError::MissingRootProject(root.clone()))?;
        let bytes = std::fs::read(&located.path).map_err(|e| HostError::LoadFailed {
            report: format_load_failure(
                root,
                &[format!(
                    "could not read prebuilt image '{}': {e}",
                    located.path.display()
                )],
            ),
        })?;
        Ok(Arc::new(CompilationResult {
            identity: root.clone(),
            binary: Some(bytes),
            symbols: None,
            diagnostics: Vec::new(),
            references: Vec::new(),
            neutral_artifacts: Vec::new(),
        }))
    }
}
