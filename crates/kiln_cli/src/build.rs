//! `kiln build` — compile every unit in the dependency graph.
//!
//! Resolves the graph first, failing fast with the unresolved report, then
//! drives the compilation cache from the root so each unit compiles exactly
//! once. Diagnostics from every compiled unit are rendered at the end.

use std::sync::Arc;

use kiln_compile::{CompilationCache, ManifestCompiler};
use kiln_diagnostics::Diagnostic;
use kiln_host::format_unresolved_report;

use crate::pipeline::{build_resolver, load_project, render_diagnostics, unit_roots};
use crate::{BuildArgs, GlobalArgs, ReportFormat};

/// Runs the `kiln build` command.
///
/// Returns exit code 0 on a clean build, 1 on unresolved dependencies or
/// failing diagnostics.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (project_dir, config) = load_project(global)?;

    let Some(root) = config.root_identity()? else {
        eprintln!("no root unit configured in kiln.toml");
        return Ok(0);
    };

    if !global.quiet {
        eprintln!(
            "   Building {} v{} for {}",
            config.application.name, config.application.version, config.platform.target
        );
    }

    // Step 1: resolve; unresolved references are reported before any
    // compilation starts
    let resolver = build_resolver(&config, &project_dir);
    let platform = config.target_platform();
    let resolution = resolver.resolve(&root, &platform);

    if !resolution.is_fully_resolved() {
        eprint!("{}", format_unresolved_report(&resolution));
        return Ok(1);
    }

    // Step 2: compile the graph through the cache
    let cache = CompilationCache::new(Arc::new(ManifestCompiler::new(unit_roots(
        &config,
        &project_dir,
    ))));
    cache.get_or_compile(&root, &platform);

    if !global.quiet {
        eprintln!("   Compiled {} unit(s)", cache.len());
    }

    // Step 3: gather diagnostics in graph order
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    for node in resolution.graph().node_weights() {
        if let Some(result) = cache.get(&node.identity) {
            diagnostics.extend(result.diagnostics.iter().cloned());
        }
    }

    let error_count = match args.format {
        ReportFormat::Text => render_diagnostics(&diagnostics, global.quiet),
        ReportFormat::Json => {
            let json =
                serde_json::to_string_pretty(&diagnostics).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
            diagnostics
                .iter()
                .filter(|d| d.severity.is_error())
                .count()
        }
    };

    if error_count > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}
