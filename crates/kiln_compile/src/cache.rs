//! The memoizing compilation cache.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use kiln_common::{TargetPlatform, UnitIdentity};
use kiln_diagnostics::Diagnostic;

use crate::compiler::Compiler;
use crate::result::CompilationResult;

/// Memoizes compiler invocations per unit identity.
///
/// A given identity compiles at most once per cache lifetime; every consumer
/// observes the same `Arc<CompilationResult>`. On a miss, the cache compiles
/// the unit, then recursively populates itself for every project reference
/// the compiler named, so diamond-shaped graphs compile each shared ancestor
/// exactly once.
///
/// Writes for one identity go through a per-identity mutual-exclusion
/// section: concurrent callers racing on the same identity serialize and
/// the second one finds the stored result. Failing compilations are cached
/// too — recompiling a known-bad unit on every reference would only repeat
/// the failure.
pub struct CompilationCache {
    compiler: Arc<dyn Compiler>,
    entries: Mutex<HashMap<UnitIdentity, Arc<CompilationResult>>>,
    gates: Mutex<HashMap<UnitIdentity, Arc<Mutex<()>>>>,
}

impl CompilationCache {
    /// Creates an empty cache over the given compiler capability.
    pub fn new(compiler: Arc<dyn Compiler>) -> Self {
        Self {
            compiler,
            entries: Mutex::new(HashMap::new()),
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached result for `identity`, compiling it (and,
    /// recursively, its project references) on a miss.
    ///
    /// Returns `None` when the compiler reports no such buildable unit —
    /// a normal fall-through signal, not an error, and not cached: the unit
    /// may still be satisfied by a prebuilt package.
    pub fn get_or_compile(
        &self,
        identity: &UnitIdentity,
        platform: &TargetPlatform,
    ) -> Option<Arc<CompilationResult>> {
        let mut visiting = HashSet::new();
        self.compile_recursive(identity, platform, &mut visiting)
    }

    /// Returns the cached result for `identity` without compiling.
    pub fn get(&self, identity: &UnitIdentity) -> Option<Arc<CompilationResult>> {
        self.entries.lock().unwrap().get(identity).cloned()
    }

    /// Returns the number of cached results.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Returns `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// Discards the entire cache.
    ///
    /// Invalidation is wholesale, never entry-by-entry: a single source
    /// change can affect any node transitively, so a reload starts from an
    /// empty cache.
    pub fn invalidate_all(&self) {
        self.entries.lock().unwrap().clear();
    }

    fn compile_recursive(
        &self,
        identity: &UnitIdentity,
        platform: &TargetPlatform,
        visiting: &mut HashSet<UnitIdentity>,
    ) -> Option<Arc<CompilationResult>> {
        if let Some(hit) = self.get(identity) {
            return Some(hit);
        }

        let gate = self.gate(identity);
        let _guard = gate.lock().unwrap();

        // A racing caller may have stored the result while we waited
        if let Some(hit) = self.get(identity) {
            return Some(hit);
        }

        let output = self.compiler.compile(identity, platform)?;

        visiting.insert(identity.clone());
        let mut diagnostics = output.diagnostics;
        let mut references = Vec::new();
        for reference in &output.project_references {
            if visiting.contains(reference) {
                // An accidental reference cycle becomes a reported error on
                // the referencing unit instead of infinite recursion
                diagnostics.push(Diagnostic::error(format!(
                    "cyclic project reference: '{reference}' is already being compiled"
                )));
                continue;
            }
            if let Some(result) = self.compile_recursive(reference, platform, visiting) {
                references.push(result);
            }
        }
        visiting.remove(identity);

        let result = Arc::new(CompilationResult {
            identity: identity.clone(),
            binary: output.binary,
            symbols: output.symbols,
            diagnostics,
            references,
            neutral_artifacts: output.neutral_artifacts,
        });
        self.entries
            .lock()
            .unwrap()
            .insert(identity.clone(), Arc::clone(&result));
        Some(result)
    }

    fn gate(&self, identity: &UnitIdentity) -> Arc<Mutex<()>> {
        let mut gates = self.gates.lock().unwrap();
        Arc::clone(gates.entry(identity.clone()).or_default())
    }
}
