//! The dependency graph walk.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use kiln_common::{TargetPlatform, UnitIdentity};
use petgraph::graph::{DiGraph, NodeIndex};

use crate::node::DependencyNode;
use crate::provider::UnitProvider;

/// The outcome of one dependency graph resolution.
///
/// Holds the directed graph of dependency nodes — acyclic by construction,
/// with every distinct identity appearing exactly once — plus lookups for
/// reporting.
pub struct Resolution {
    graph: DiGraph<DependencyNode, ()>,
    indices: HashMap<UnitIdentity, NodeIndex>,
    root: NodeIndex,
}

impl Resolution {
    /// Returns the underlying dependency graph.
    pub fn graph(&self) -> &DiGraph<DependencyNode, ()> {
        &self.graph
    }

    /// Returns the root node of the resolution.
    pub fn root(&self) -> &DependencyNode {
        &self.graph[self.root]
    }

    /// Looks up the node for a unit identity, if it was reached.
    pub fn node(&self, identity: &UnitIdentity) -> Option<&DependencyNode> {
        self.indices.get(identity).map(|&ix| &self.graph[ix])
    }

    /// Returns the number of distinct units reached from the root.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns `true` when every reached node was satisfied.
    pub fn is_fully_resolved(&self) -> bool {
        self.graph.node_weights().all(|n| n.resolved)
    }

    /// Returns the unresolved nodes sorted by identity name.
    ///
    /// The order is stable and user-scannable; it is the order the host's
    /// failure report lists them in.
    pub fn unresolved(&self) -> Vec<&DependencyNode> {
        let mut nodes: Vec<_> = self
            .graph
            .node_weights()
            .filter(|n| !n.resolved)
            .collect();
        nodes.sort_by(|a, b| a.identity.cmp(&b.identity));
        nodes
    }

    /// Returns every location searched across all unresolved nodes, in node
    /// order, with duplicates removed.
    pub fn searched_locations(&self) -> Vec<&Path> {
        let mut seen = HashSet::new();
        let mut locations = Vec::new();
        for node in self.unresolved() {
            for path in &node.searched {
                if seen.insert(path.as_path()) {
                    locations.push(path.as_path());
                }
            }
        }
        locations
    }
}

/// Walks a root unit's declared references into a [`Resolution`].
///
/// Providers are consulted in registration order for every identity. The
/// walk is depth-first with an explicit on-path set: a reference that closes
/// a cycle marks the referencing node unresolved and the back edge is
/// dropped, so the stored graph stays acyclic and an accidental cycle
/// becomes a reported condition instead of infinite recursion.
pub struct GraphResolver {
    providers: Vec<Box<dyn UnitProvider>>,
}

impl GraphResolver {
    /// Creates a resolver consulting the given providers in order.
    pub fn new(providers: Vec<Box<dyn UnitProvider>>) -> Self {
        Self { providers }
    }

    /// Locates a single identity through the providers, without walking
    /// its references.
    pub fn locate(
        &self,
        identity: &UnitIdentity,
        platform: &TargetPlatform,
    ) -> Option<crate::provider::LocatedUnit> {
        self.providers
            .iter()
            .find_map(|p| p.locate(identity, platform))
    }

    /// Resolves the full dependency graph of `root` for `platform`.
    ///
    /// Best-effort: unsatisfied references never stop sibling branches, so
    /// the resolution carries the complete unresolved set.
    pub fn resolve(&self, root: &UnitIdentity, platform: &TargetPlatform) -> Resolution {
        let mut graph = DiGraph::new();
        let mut indices = HashMap::new();
        let mut on_path = HashSet::new();
        let root_ix = self.visit(root, platform, &mut graph, &mut indices, &mut on_path);
        Resolution {
            graph,
            indices,
            root: root_ix,
        }
    }

    fn visit(
        &self,
        identity: &UnitIdentity,
        platform: &TargetPlatform,
        graph: &mut DiGraph<DependencyNode, ()>,
        indices: &mut HashMap<UnitIdentity, NodeIndex>,
        on_path: &mut HashSet<UnitIdentity>,
    ) -> NodeIndex {
        if let Some(&ix) = indices.get(identity) {
            return ix;
        }

        let located = self
            .providers
            .iter()
            .find_map(|p| p.locate(identity, platform));

        match located {
            Some(located) => {
                let ix = graph.add_node(DependencyNode::resolved(
                    identity.clone(),
                    located.references.clone(),
                ));
                indices.insert(identity.clone(), ix);
                on_path.insert(identity.clone());
                for reference in &located.references {
                    if on_path.contains(reference) {
                        // Reference cycle: error condition, back edge dropped
                        graph[ix].resolved = false;
                        continue;
                    }
                    let child = self.visit(reference, platform, graph, indices, on_path);
                    graph.add_edge(ix, child, ());
                }
                on_path.remove(identity);
                ix
            }
            None => {
                let searched = self
                    .providers
                    .iter()
                    .flat_map(|p| p.candidate_locations(identity, platform))
                    .collect();
                let ix = graph.add_node(DependencyNode::unresolved(identity.clone(), searched));
                indices.insert(identity.clone(), ix);
                ix
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::LocatedUnit;
    use std::path::PathBuf;

    /// In-memory provider for graph-shape tests.
    struct StaticProvider {
        units: HashMap<UnitIdentity, Vec<UnitIdentity>>,
        base: PathBuf,
    }

    impl StaticProvider {
        fn new(base: &str, units: &[(&str, &str, &[(&str, &str)])]) -> Self {
            let mut map = HashMap::new();
            for (name, version, refs) in units {
                let references = refs
                    .iter()
                    .map(|(n, v)| UnitIdentity::new(*n, *v))
                    .collect();
                map.insert(UnitIdentity::new(*name, *version), references);
            }
            Self {
                units: map,
                base: PathBuf::from(base),
            }
        }
    }

    impl UnitProvider for StaticProvider {
        fn locate(
            &self,
            identity: &UnitIdentity,
            _platform: &TargetPlatform,
        ) -> Option<LocatedUnit> {
            self.units.get(identity).map(|references| LocatedUnit {
                identity: identity.clone(),
                references: references.clone(),
                path: self.base.join(&identity.name),
            })
        }

        fn candidate_locations(
            &self,
            identity: &UnitIdentity,
            _platform: &TargetPlatform,
        ) -> Vec<PathBuf> {
            vec![self.base.join(&identity.name)]
        }
    }

    fn platform() -> TargetPlatform {
        TargetPlatform::new("net-x")
    }

    #[test]
    fn single_unit_resolves() {
        let provider = StaticProvider::new("/units", &[("App", "1.0", &[])]);
        let resolver = GraphResolver::new(vec![Box::new(provider)]);
        let resolution = resolver.resolve(&UnitIdentity::new("App", "1.0"), &platform());

        assert!(resolution.is_fully_resolved());
        assert_eq!(resolution.node_count(), 1);
        assert_eq!(resolution.root().identity, UnitIdentity::new("App", "1.0"));
    }

    #[test]
    fn chain_counts_distinct_identities() {
        let provider = StaticProvider::new(
            "/units",
            &[
                ("App", "1.0", &[("Lib", "1.0")]),
                ("Lib", "1.0", &[("Core", "1.0")]),
                ("Core", "1.0", &[]),
            ],
        );
        let resolver = GraphResolver::new(vec![Box::new(provider)]);
        let resolution = resolver.resolve(&UnitIdentity::new("App", "1.0"), &platform());

        assert!(resolution.is_fully_resolved());
        assert_eq!(resolution.node_count(), 3);
    }

    #[test]
    fn diamond_shares_one_node() {
        let provider = StaticProvider::new(
            "/units",
            &[
                ("A", "1.0", &[("B", "1.0"), ("C", "1.0")]),
                ("B", "1.0", &[("D", "1.0")]),
                ("C", "1.0", &[("D", "1.0")]),
                ("D", "1.0", &[]),
            ],
        );
        let resolver = GraphResolver::new(vec![Box::new(provider)]);
        let resolution = resolver.resolve(&UnitIdentity::new("A", "1.0"), &platform());

        assert!(resolution.is_fully_resolved());
        // D appears once even though two paths reach it
        assert_eq!(resolution.node_count(), 4);
        assert_eq!(resolution.graph().edge_count(), 4);
    }

    #[test]
    fn unresolved_siblings_all_reported_sorted() {
        let provider = StaticProvider::new(
            "/units",
            &[("App", "1.0", &[("Zeta", "1.0"), ("Alpha", "1.0")])],
        );
        let resolver = GraphResolver::new(vec![Box::new(provider)]);
        let resolution = resolver.resolve(&UnitIdentity::new("App", "1.0"), &platform());

        assert!(!resolution.is_fully_resolved());
        let unresolved = resolution.unresolved();
        assert_eq!(unresolved.len(), 2);
        // Sorted by name, not by declaration order
        assert_eq!(unresolved[0].identity.name, "Alpha");
        assert_eq!(unresolved[1].identity.name, "Zeta");
    }

    #[test]
    fn unresolved_node_records_provider_locations_in_order() {
        let local = StaticProvider::new("/units", &[("App", "1.0", &[("Lib", "1.0")])]);
        let packages = StaticProvider::new("/packages", &[]);
        let resolver = GraphResolver::new(vec![Box::new(local), Box::new(packages)]);
        let resolution = resolver.resolve(&UnitIdentity::new("App", "1.0"), &platform());

        let unresolved = resolution.unresolved();
        assert_eq!(unresolved.len(), 1);
        assert_eq!(
            unresolved[0].searched,
            vec![PathBuf::from("/units/Lib"), PathBuf::from("/packages/Lib")]
        );
    }

    #[test]
    fn searched_locations_deduplicated() {
        // Two unresolved units searched through the same provider roots:
        // shared root paths must appear once each in the aggregate.
        struct FixedLocations;
        impl UnitProvider for FixedLocations {
            fn locate(&self, _: &UnitIdentity, _: &TargetPlatform) -> Option<LocatedUnit> {
                None
            }
            fn candidate_locations(&self, _: &UnitIdentity, _: &TargetPlatform) -> Vec<PathBuf> {
                vec![PathBuf::from("/shared/root")]
            }
        }

        let local = StaticProvider::new(
            "/units",
            &[("App", "1.0", &[("B", "1.0"), ("C", "1.0")])],
        );
        let resolver = GraphResolver::new(vec![Box::new(local), Box::new(FixedLocations)]);
        let resolution = resolver.resolve(&UnitIdentity::new("App", "1.0"), &platform());

        let locations = resolution.searched_locations();
        let shared_count = locations
            .iter()
            .filter(|p| **p == Path::new("/shared/root"))
            .count();
        assert_eq!(shared_count, 1);
    }

    #[test]
    fn cycle_is_detected_not_followed() {
        let provider = StaticProvider::new(
            "/units",
            &[
                ("A", "1.0", &[("B", "1.0")]),
                ("B", "1.0", &[("A", "1.0")]),
            ],
        );
        let resolver = GraphResolver::new(vec![Box::new(provider)]);
        let resolution = resolver.resolve(&UnitIdentity::new("A", "1.0"), &platform());

        // The walk terminates, the graph stays acyclic, and the node whose
        // reference closed the cycle is reported unresolved.
        assert_eq!(resolution.node_count(), 2);
        assert!(!petgraph::algo::is_cyclic_directed(resolution.graph()));
        assert!(!resolution.is_fully_resolved());
        assert_eq!(resolution.unresolved()[0].identity.name, "B");
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let provider = StaticProvider::new("/units", &[("A", "1.0", &[("A", "1.0")])]);
        let resolver = GraphResolver::new(vec![Box::new(provider)]);
        let resolution = resolver.resolve(&UnitIdentity::new("A", "1.0"), &platform());

        assert_eq!(resolution.node_count(), 1);
        assert!(!resolution.is_fully_resolved());
    }

    #[test]
    fn first_provider_wins() {
        let local = StaticProvider::new("/units", &[("Lib", "1.0", &[])]);
        let packages = StaticProvider::new("/packages", &[("Lib", "1.0", &[])]);
        let resolver = GraphResolver::new(vec![Box::new(local), Box::new(packages)]);
        let resolution = resolver.resolve(&UnitIdentity::new("Lib", "1.0"), &platform());

        // Both providers could satisfy Lib; the first registered one did.
        assert!(resolution.is_fully_resolved());
        assert_eq!(resolution.node_count(), 1);
    }

    #[test]
    fn node_lookup_by_identity() {
        let provider = StaticProvider::new(
            "/units",
            &[("App", "1.0", &[("Lib", "1.0")]), ("Lib", "1.0", &[])],
        );
        let resolver = GraphResolver::new(vec![Box::new(provider)]);
        let resolution = resolver.resolve(&UnitIdentity::new("App", "1.0"), &platform());

        assert!(resolution.node(&UnitIdentity::new("Lib", "1.0")).is_some());
        assert!(resolution.node(&UnitIdentity::new("Ghost", "1.0")).is_none());
    }
}
