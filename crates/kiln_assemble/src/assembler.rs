//! Combining binaries, resources, and neutral reference artifacts into
//! loadable payloads.

use std::collections::HashSet;

use kiln_common::UnitIdentity;
use kiln_compile::CompilationResult;

use crate::provider::{CompositeResourceProvider, ResourceProvider};
use crate::resource::{ResourceDescriptor, ResourceSource, ResourceVisibility};

/// The binary extension given to neutral reference artifact resources.
const ARTIFACT_EXT: &str = "kbin";

/// A fully assembled, loadable payload: the unit's binary plus its resource
/// list. Lives entirely in memory.
#[derive(Debug)]
pub struct Payload {
    /// The compiled unit image.
    pub binary: Vec<u8>,
    /// The unit's resources, own resources first, then transitively
    /// collected neutral reference artifacts.
    pub resources: Vec<ResourceDescriptor>,
}

/// Error raised when a payload cannot be assembled.
#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    /// The compilation result carries no binary to assemble.
    #[error("no binary to assemble for unit '{identity}'")]
    MissingBinary {
        /// The unit the payload was requested for.
        identity: UnitIdentity,
    },
}

/// Assembles payloads from compilation results.
///
/// The resource composition is per-unit (callers build it from the unit's
/// manifest); the neutral reference artifacts are collected from every unit
/// reachable through the result's reference graph.
pub struct ArtifactAssembler {
    provider: CompositeResourceProvider,
}

impl ArtifactAssembler {
    /// Creates an assembler over the given resource composition.
    pub fn new(provider: CompositeResourceProvider) -> Self {
        Self { provider }
    }

    /// Assembles the payload for `result`.
    ///
    /// Starts from the unit's own provided resources, then appends one
    /// publicly visible `<reference-name>.kbin` resource per neutral
    /// reference artifact reachable through the reference graph. Artifacts
    /// are deduplicated by name with first-seen-wins precedence in a
    /// pre-order walk starting at the unit itself.
    pub fn assemble(&self, result: &CompilationResult) -> Result<Payload, AssembleError> {
        let binary = result
            .binary
            .clone()
            .ok_or_else(|| AssembleError::MissingBinary {
                identity: result.identity.clone(),
            })?;

        let mut resources = self.provider.resources();

        let mut seen = HashSet::new();
        collect_neutral_artifacts(result, &mut seen, &mut resources);

        Ok(Payload { binary, resources })
    }
}

/// Pre-order walk over the reference graph appending neutral artifacts.
///
/// `seen` keys by artifact name, so the first producer of a name wins and a
/// diamond contributes each shared artifact once.
fn collect_neutral_artifacts(
    result: &CompilationResult,
    seen: &mut HashSet<String>,
    resources: &mut Vec<ResourceDescriptor>,
) {
    for artifact in &result.neutral_artifacts {
        if seen.insert(artifact.name.clone()) {
            resources.push(ResourceDescriptor {
                name: format!("{}.{ARTIFACT_EXT}", artifact.name),
                source: ResourceSource::Inline(artifact.bytes.clone()),
                visibility: ResourceVisibility::Public,
            });
        }
    }
    for reference in &result.references {
        collect_neutral_artifacts(reference, seen, resources);
    }
}
