//! The default manifest-driven compiler capability.
//!
//! "Compilation" here is packaging: the unit's declared sources are bundled
//! deterministically and wrapped in the unit image container. A real
//! language backend would slot in behind the same [`Compiler`] trait.

use std::path::PathBuf;

use kiln_common::{TargetPlatform, UnitIdentity};
use kiln_config::{load_manifest, MANIFEST_FILE};
use kiln_diagnostics::{Diagnostic, DiagnosticSink};

use crate::compiler::{CompileOutput, Compiler};
use crate::image::encode_image;
use crate::result::NeutralArtifact;

/// Compiles local source units from their `unit.toml` manifests.
///
/// A unit whose directory carries no manifest is "not a buildable unit"
/// (`None` — callers fall through to prebuilt packages). Manifest problems,
/// missing sources, and unsupported platforms are error diagnostics in the
/// output, never panics or `Err`s: the cache stores the failing result and
/// the loader decides what to do with it.
pub struct ManifestCompiler {
    unit_roots: Vec<PathBuf>,
}

impl ManifestCompiler {
    /// Creates a compiler searching the given unit root directories in
    /// order.
    pub fn new(unit_roots: Vec<PathBuf>) -> Self {
        Self { unit_roots }
    }

    fn find_unit_dir(&self, name: &str) -> Option<PathBuf> {
        self.unit_roots
            .iter()
            .map(|root| root.join(name))
            .find(|dir| dir.join(MANIFEST_FILE).is_file())
    }
}

impl Compiler for ManifestCompiler {
    fn compile(
        &self,
        identity: &UnitIdentity,
        platform: &TargetPlatform,
    ) -> Option<CompileOutput> {
        let dir = self.find_unit_dir(&identity.name)?;

        let manifest = match load_manifest(&dir) {
            Ok(manifest) => manifest,
            Err(e) => {
                return Some(CompileOutput {
                    diagnostics: vec![Diagnostic::error(format!(
                        "invalid unit manifest at '{}': {e}",
                        dir.join(MANIFEST_FILE).display()
                    ))],
                    ..Default::default()
                });
            }
        };

        let sink = DiagnosticSink::new();

        if manifest.identity() != *identity {
            sink.emit(Diagnostic::error(format!(
                "manifest at '{}' declares '{}', expected '{}'",
                dir.display(),
                manifest.identity(),
                identity
            )));
        }
        if !manifest.supports_platform(platform) {
            sink.emit(Diagnostic::error(format!(
                "unit '{}' does not support target platform '{platform}'",
                identity.name
            )));
        }

        let project_references = match manifest.references() {
            Ok(references) => references,
            Err(e) => {
                sink.emit(Diagnostic::error(e.to_string()));
                Vec::new()
            }
        };

        if manifest.build.sources.is_empty() {
            sink.emit(Diagnostic::warning(format!(
                "unit '{}' declares no sources",
                identity.name
            )));
        }

        // Bundle sources in declaration order; the image checksum makes the
        // result tamper-evident.
        let mut bundle = Vec::new();
        let mut symbols = String::new();
        for source in &manifest.build.sources {
            let path = dir.join(source);
            match std::fs::read(&path) {
                Ok(bytes) => {
                    symbols.push_str(&format!("{source} {}\n", bytes.len()));
                    bundle.extend_from_slice(
                        format!(">> {source} ({} bytes)\n", bytes.len()).as_bytes(),
                    );
                    bundle.extend_from_slice(&bytes);
                    bundle.push(b'\n');
                }
                Err(_) => {
                    sink.emit(Diagnostic::error(format!(
                        "missing source file '{source}' in unit '{}'",
                        identity.name
                    )));
                }
            }
        }

        if sink.has_errors() {
            return Some(CompileOutput {
                binary: None,
                symbols: None,
                diagnostics: sink.take_all(),
                project_references,
                neutral_artifacts: Vec::new(),
            });
        }

        let binary = match encode_image(identity, &bundle) {
            Ok(binary) => binary,
            Err(e) => {
                sink.emit(Diagnostic::error(e.to_string()));
                return Some(CompileOutput {
                    binary: None,
                    symbols: None,
                    diagnostics: sink.take_all(),
                    project_references,
                    neutral_artifacts: Vec::new(),
                });
            }
        };

        let neutral_artifacts = if manifest.unit.neutral {
            vec![NeutralArtifact {
                name: identity.name.clone(),
                bytes: binary.clone(),
            }]
        } else {
            Vec::new()
        };

        Some(CompileOutput {
            binary: Some(binary),
            symbols: Some(symbols.into_bytes()),
            diagnostics: sink.take_all(),
            project_references,
            neutral_artifacts,
        })
    }
}
