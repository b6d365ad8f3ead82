//! `kiln init` — project scaffolding command.
//!
//! Creates a new Kiln project directory with a `kiln.toml` host
//! configuration, a root unit under `units/`, and an empty `packages/`
//! directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Runs the `kiln init` command.
///
/// If `name` is `Some`, creates a new subdirectory with that name.
/// Otherwise initializes in the current working directory.
/// Returns exit code 0 on success.
pub fn run(name: Option<String>) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = match &name {
        Some(n) => {
            let dir = PathBuf::from(n);
            if dir.exists() {
                return Err(format!("directory '{n}' already exists").into());
            }
            fs::create_dir_all(&dir)?;
            dir
        }
        None => std::env::current_dir()?,
    };

    let project_name = project_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("app")
        .to_string();

    eprintln!("  Creating new Kiln project `{project_name}`");

    create_directories(&project_dir, &project_name)?;
    write_kiln_toml(&project_dir, &project_name)?;
    write_root_unit(&project_dir, &project_name)?;

    eprintln!("     Created {}", project_dir.join("kiln.toml").display());
    eprintln!(
        "     Created {}",
        project_dir
            .join("units")
            .join(&project_name)
            .join("unit.toml")
            .display()
    );

    Ok(0)
}

/// Creates the standard project directories.
fn create_directories(root: &Path, project_name: &str) -> io::Result<()> {
    fs::create_dir_all(root.join("units").join(project_name))?;
    fs::create_dir_all(root.join("packages"))?;
    Ok(())
}

/// Writes the `kiln.toml` host configuration file.
fn write_kiln_toml(root: &Path, name: &str) -> io::Result<()> {
    let content = format!(
        r#"[application]
name = "{name}"
version = "0.1.0"
root = "{name}@0.1.0"

[platform]
target = "net-x"

[search]
unit_dirs = ["units"]
package_dirs = ["packages"]

[watch]
enabled = true
poll_interval_ms = 500
wait_for_debugger = false
"#
    );
    fs::write(root.join("kiln.toml"), content)
}

/// Writes the root unit's manifest and template source file.
fn write_root_unit(root: &Path, name: &str) -> io::Result<()> {
    let unit_dir = root.join("units").join(name);
    let manifest = format!(
        r#"[unit]
name = "{name}"
version = "0.1.0"

[build]
sources = ["main.ks"]
"#
    );
    fs::write(unit_dir.join("unit.toml"), manifest)?;
    fs::write(unit_dir.join("main.ks"), "// entry point\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_config::{load_config, load_manifest};

    #[test]
    fn scaffold_is_loadable() {
        let tmp = tempfile::tempdir().unwrap();
        let project = tmp.path().join("demo");

        let code = run(Some(project.to_str().unwrap().to_string())).unwrap();
        assert_eq!(code, 0);

        let config = load_config(&project).unwrap();
        assert_eq!(config.application.name, "demo");
        let root = config.root_identity().unwrap().unwrap();
        assert_eq!(root.name, "demo");

        let manifest = load_manifest(&project.join("units/demo")).unwrap();
        assert_eq!(manifest.unit.name, "demo");
        assert!(project.join("units/demo/main.ks").exists());
        assert!(project.join("packages").is_dir());
    }

    #[test]
    fn existing_directory_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let project = tmp.path().join("demo");
        fs::create_dir_all(&project).unwrap();

        let err = run(Some(project.to_str().unwrap().to_string())).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
