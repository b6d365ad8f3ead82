//! Compilation results shared across the pipeline.

use kiln_common::UnitIdentity;
use kiln_diagnostics::Diagnostic;
use std::sync::Arc;

/// A binary byproduct of compiling one unit that must be embedded as a
/// resource in every dependent unit's payload.
#[derive(Debug, Clone)]
pub struct NeutralArtifact {
    /// The artifact name, unique within one compilation's reference graph.
    pub name: String,
    /// The artifact bytes.
    pub bytes: Vec<u8>,
}

/// The outcome of compiling one build unit.
///
/// Produced once per unit per cache lifetime and immutable from then on;
/// every consumer observes the same instance through an `Arc`. Failing
/// diagnostics live here next to a `None` binary — they are never raised as
/// faults from the compile layer.
#[derive(Debug)]
pub struct CompilationResult {
    /// The unit this result belongs to.
    pub identity: UnitIdentity,
    /// The compiled binary image, absent when compilation failed.
    pub binary: Option<Vec<u8>>,
    /// An auxiliary debug-symbol stream, when the compiler produced one.
    pub symbols: Option<Vec<u8>>,
    /// Diagnostics in the order the compiler produced them.
    pub diagnostics: Vec<Diagnostic>,
    /// Results of the unit's project references, one per reference that
    /// turned out to be a compilable unit.
    pub references: Vec<Arc<CompilationResult>>,
    /// Platform-neutral reference artifacts produced by this unit.
    pub neutral_artifacts: Vec<NeutralArtifact>,
}

impl CompilationResult {
    /// Returns `true` if any diagnostic has failing severity.
    ///
    /// A failing result is never loaded; the loader surfaces the diagnostic
    /// text instead.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }
}
