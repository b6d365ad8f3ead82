//! `kiln resolve` — walk the dependency graph and report it.

use kiln_host::format_unresolved_report;

use crate::pipeline::{build_resolver, load_project};
use crate::GlobalArgs;

/// Runs the `kiln resolve` command.
///
/// Prints one line per resolved unit, or the unresolved-dependency report.
/// Returns exit code 0 when the graph is fully resolved, 1 otherwise.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (project_dir, config) = load_project(global)?;

    let Some(root) = config.root_identity()? else {
        eprintln!("no root unit configured in kiln.toml");
        return Ok(0);
    };

    if !global.quiet {
        eprintln!(
            "   Resolving {} for {}",
            root,
            config.platform.target
        );
    }

    let resolver = build_resolver(&config, &project_dir);
    let resolution = resolver.resolve(&root, &config.target_platform());

    if !resolution.is_fully_resolved() {
        eprint!("{}", format_unresolved_report(&resolution));
        return Ok(1);
    }

    for node in resolution.graph().node_weights() {
        println!("{} ({} references)", node.identity, node.references.len());
    }
    if !global.quiet {
        eprintln!("   {} unit(s) resolved", resolution.node_count());
    }

    Ok(0)
}
