//! Shared pipeline helpers for CLI commands.
//!
//! Project root discovery, configuration loading, provider wiring for the
//! commands that walk the graph directly, and diagnostic rendering.

use std::path::{Path, PathBuf};

use kiln_config::{load_config, HostConfig, CONFIG_FILE};
use kiln_diagnostics::{Diagnostic, DiagnosticRenderer, Severity, TextRenderer};
use kiln_resolve::{DirectoryUnitProvider, GraphResolver, PackageProvider, UnitProvider};

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing
/// `kiln.toml`.
///
/// Returns the directory containing `kiln.toml`, or an error if none is
/// found.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir, dir →
/// itself). Otherwise walks up from the current directory.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        find_project_root(&std::env::current_dir()?)
    }
}

/// Loads the project root and its host configuration in one step.
pub fn load_project(
    global: &GlobalArgs,
) -> Result<(PathBuf, HostConfig), Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = load_config(&project_dir)?;
    Ok((project_dir, config))
}

/// Builds the standard provider stack for a project: local unit
/// directories first, then package directories.
pub fn build_resolver(config: &HostConfig, project_dir: &Path) -> GraphResolver {
    let unit_roots: Vec<PathBuf> = config
        .search
        .unit_dirs
        .iter()
        .map(|d| project_dir.join(d))
        .collect();
    let package_roots: Vec<PathBuf> = config
        .search
        .package_dirs
        .iter()
        .map(|d| project_dir.join(d))
        .collect();
    let providers: Vec<Box<dyn UnitProvider>> = vec![
        Box::new(DirectoryUnitProvider::new(unit_roots)),
        Box::new(PackageProvider::new(package_roots)),
    ];
    GraphResolver::new(providers)
}

/// Returns the unit source roots for a project.
pub fn unit_roots(config: &HostConfig, project_dir: &Path) -> Vec<PathBuf> {
    config
        .search
        .unit_dirs
        .iter()
        .map(|d| project_dir.join(d))
        .collect()
}

/// Renders diagnostics to stderr and prints a summary line.
///
/// Returns the number of error-severity diagnostics.
pub fn render_diagnostics(diagnostics: &[Diagnostic], quiet: bool) -> usize {
    let renderer = TextRenderer::new();
    for diag in diagnostics {
        eprintln!("{}", renderer.render(diag));
    }

    let error_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warning_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    if !quiet && !diagnostics.is_empty() {
        eprintln!("   Result: {error_count} error(s), {warning_count} warning(s)");
    }
    error_count
}
