//! The compiler capability boundary.

use kiln_common::{TargetPlatform, UnitIdentity};
use kiln_diagnostics::Diagnostic;

use crate::result::NeutralArtifact;

/// What a compiler capability hands back for one unit.
#[derive(Debug, Default)]
pub struct CompileOutput {
    /// The compiled binary image, absent on failure.
    pub binary: Option<Vec<u8>>,
    /// An auxiliary debug-symbol stream, when available.
    pub symbols: Option<Vec<u8>>,
    /// Diagnostics in production order.
    pub diagnostics: Vec<Diagnostic>,
    /// References the compiler identifies as project references; the cache
    /// recursively compiles each of these.
    pub project_references: Vec<UnitIdentity>,
    /// Platform-neutral reference artifacts produced alongside the binary.
    pub neutral_artifacts: Vec<NeutralArtifact>,
}

/// The opaque compiler capability consumed by the compilation cache.
///
/// Returning `None` means "no such buildable unit" — a normal signal that
/// callers fall through to other resolution strategies (e.g. a prebuilt
/// package), not an error. Implementations must be safe to call
/// concurrently for distinct identities and must not observably mutate
/// global compiler state between calls for the same identity within one
/// process lifetime.
pub trait Compiler: Send + Sync {
    /// Compiles `identity` for `platform`, or reports the unit as not
    /// buildable.
    fn compile(&self, identity: &UnitIdentity, platform: &TargetPlatform)
        -> Option<CompileOutput>;
}
