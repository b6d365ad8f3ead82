//! Host boundary errors.

use kiln_common::{InternalError, UnitIdentity};

/// Failures surfaced at the host boundary.
///
/// Every variant renders as a single human-readable block — downstream
/// tooling that needs structure must parse it; the boundary is
/// message-based by design.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HostError {
    /// No build unit exists at the configured root. Fatal at host
    /// construction time.
    #[error("no build unit found for configured root '{0}'")]
    MissingRootProject(UnitIdentity),

    /// One or more dependency graph nodes could not be satisfied. The
    /// report is the formatted block described by the failure report
    /// format: sorted unresolved identities, deduplicated search
    /// locations, remediation hint.
    #[error("{report}")]
    UnresolvedDependencies {
        /// The formatted unresolved-dependency report.
        report: String,
    },

    /// The entry unit compiled with failing diagnostics or no loader
    /// accepted its payload.
    #[error("{report}")]
    LoadFailed {
        /// The formatted load-failure block.
        report: String,
    },

    /// The host configuration is unusable (e.g. a malformed root unit
    /// reference that slipped past loading).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A bug in the host itself, never a user input problem.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_root_display() {
        let err = HostError::MissingRootProject(UnitIdentity::new("App", "1.0"));
        assert_eq!(
            err.to_string(),
            "no build unit found for configured root 'App, 1.0'"
        );
    }

    #[test]
    fn report_variants_display_verbatim() {
        let err = HostError::UnresolvedDependencies {
            report: "the report".to_string(),
        };
        assert_eq!(err.to_string(), "the report");
    }
}
