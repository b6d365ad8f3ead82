//! Formatting of user-visible failure blocks.

use kiln_common::UnitIdentity;
use kiln_resolve::Resolution;

/// The fixed remediation hint closing every unresolved-dependency report.
pub const REMEDIATION_HINT: &str = "Ensure the unit names and versions are spelled correctly \
and that every referenced unit is present in a configured search directory, then restart the host.";

/// Formats the single failure block for an incomplete resolution.
///
/// Layout: one `Name, Version` line per unresolved node, sorted by name;
/// then every search location attempted, deduplicated; then the fixed
/// remediation hint.
pub fn format_unresolved_report(resolution: &Resolution) -> String {
    let mut out = String::from("The dependency graph could not be fully resolved.\n");

    out.push_str("\nUnresolved units:\n");
    for node in resolution.unresolved() {
        out.push_str("  ");
        out.push_str(&node.identity.to_string());
        out.push('\n');
    }

    out.push_str("\nSearched locations:\n");
    let locations = resolution.searched_locations();
    if locations.is_empty() {
        out.push_str("  (none)\n");
    }
    for path in locations {
        out.push_str("  ");
        out.push_str(&path.display().to_string());
        out.push('\n');
    }

    out.push('\n');
    out.push_str(REMEDIATION_HINT);
    out.push('\n');
    out
}

/// Formats the single failure block for an entry unit that would not load.
pub fn format_load_failure(identity: &UnitIdentity, errors: &[String]) -> String {
    let mut out = format!("Unit '{identity}' failed to load:\n");
    for error in errors {
        out.push_str("  ");
        out.push_str(error);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_common::TargetPlatform;
    use kiln_resolve::{GraphResolver, LocatedUnit, UnitProvider};
    use std::path::PathBuf;

    /// Provider with one known root that references units nobody has.
    struct RootOnly;

    impl UnitProvider for RootOnly {
        fn locate(
            &self,
            identity: &UnitIdentity,
            _platform: &TargetPlatform,
        ) -> Option<LocatedUnit> {
            (identity.name == "App").then(|| LocatedUnit {
                identity: identity.clone(),
                references: vec![
                    UnitIdentity::new("Zeta", "1.0"),
                    UnitIdentity::new("Alpha", "1.0"),
                ],
                path: PathBuf::from("/units/App"),
            })
        }

        fn candidate_locations(
            &self,
            identity: &UnitIdentity,
            platform: &TargetPlatform,
        ) -> Vec<PathBuf> {
            vec![PathBuf::from(format!(
                "/units/{}/{}",
                platform.as_str(),
                identity.name
            ))]
        }
    }

    #[test]
    fn report_lines_sorted_and_hint_present() {
        let resolver = GraphResolver::new(vec![Box::new(RootOnly)]);
        let resolution = resolver.resolve(
            &UnitIdentity::new("App", "1.0"),
            &TargetPlatform::new("net-x"),
        );

        let report = format_unresolved_report(&resolution);
        let alpha = report.find("Alpha, 1.0").unwrap();
        let zeta = report.find("Zeta, 1.0").unwrap();
        assert!(alpha < zeta, "unresolved lines must sort by name");
        assert!(report.contains("/units/net-x/Alpha"));
        assert!(report.contains("/units/net-x/Zeta"));
        assert!(report.ends_with(&format!("{REMEDIATION_HINT}\n")));
    }

    #[test]
    fn load_failure_block_lists_all_errors() {
        let block = format_load_failure(
            &UnitIdentity::new("App", "1.0"),
            &["error: first".to_string(), "warning: second".to_string()],
        );
        assert!(block.starts_with("Unit 'App, 1.0' failed to load:\n"));
        assert!(block.contains("  error: first\n"));
        assert!(block.contains("  warning: second\n"));
    }
}
