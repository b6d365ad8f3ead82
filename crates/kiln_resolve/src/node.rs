//! Nodes of the resolved dependency graph.

use kiln_common::UnitIdentity;
use std::path::PathBuf;

/// One build unit in the dependency graph.
///
/// Owned exclusively by the resolver for the duration of one resolution.
/// Unresolved nodes retain every search location attempted so the host can
/// report where each provider looked.
#[derive(Debug, Clone)]
pub struct DependencyNode {
    /// The unit this node stands for.
    pub identity: UnitIdentity,
    /// Declared references in declaration order. Empty for unresolved nodes
    /// and for prebuilt packages.
    pub references: Vec<UnitIdentity>,
    /// Whether any provider satisfied this unit for the target platform.
    pub resolved: bool,
    /// The locations searched for this unit, in provider order. Populated
    /// only when resolution failed.
    pub searched: Vec<PathBuf>,
}

impl DependencyNode {
    /// Creates a resolved node with its declared references.
    pub fn resolved(identity: UnitIdentity, references: Vec<UnitIdentity>) -> Self {
        Self {
            identity,
            references,
            resolved: true,
            searched: Vec::new(),
        }
    }

    /// Creates an unresolved node retaining the locations searched.
    pub fn unresolved(identity: UnitIdentity, searched: Vec<PathBuf>) -> Self {
        Self {
            identity,
            references: Vec::new(),
            resolved: false,
            searched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_node_has_no_searched_locations() {
        let node = DependencyNode::resolved(
            UnitIdentity::new("App", "1.0"),
            vec![UnitIdentity::new("Lib", "1.0")],
        );
        assert!(node.resolved);
        assert!(node.searched.is_empty());
        assert_eq!(node.references.len(), 1);
    }

    #[test]
    fn unresolved_node_retains_locations() {
        let node = DependencyNode::unresolved(
            UnitIdentity::new("Lib", "1.0"),
            vec![PathBuf::from("/units/Lib"), PathBuf::from("/packages/Lib")],
        );
        assert!(!node.resolved);
        assert_eq!(node.searched.len(), 2);
    }
}
