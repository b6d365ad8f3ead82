//! Dependency graph resolution for the Kiln build host.
//!
//! Given a root unit identity and a target platform, the resolver walks
//! declared references depth-first, locating each reference through an
//! ordered list of unit providers. The result is an acyclic directed graph
//! of dependency nodes in which every distinct identity appears exactly
//! once, plus the full set of nodes that could not be satisfied.
//!
//! Resolution is best-effort: a failure in one branch never stops sibling
//! branches, so the complete unresolved set is reported in a single pass.
//! No compilation happens here.

#![warn(missing_docs)]

pub mod node;
pub mod provider;
pub mod resolver;

pub use node::DependencyNode;
pub use provider::{DirectoryUnitProvider, LocatedUnit, PackageProvider, UnitProvider};
pub use resolver::{GraphResolver, Resolution};
