//! Diagnostic rendering for human-readable output.

use crate::diagnostic::Diagnostic;

/// Trait for rendering diagnostics into formatted output strings.
///
/// Implementations format diagnostics for different output targets; the
/// loader pipeline uses a renderer to turn failing diagnostics into the
/// error lines of its load-failure outcome.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics as single-line `severity: message` text.
///
/// Produces output like:
/// ```text
/// error: missing source file 'main.ks'
///   --> units/app/unit.toml:4:1
/// ```
/// The location line is omitted when the compiler reported none.
pub struct TextRenderer;

impl TextRenderer {
    /// Creates a new text renderer.
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticRenderer for TextRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        match &diag.location {
            Some(location) => format!("{}: {}\n  --> {}", diag.severity, diag.message, location),
            None => format!("{}: {}", diag.severity, diag.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::SourceLocation;

    #[test]
    fn render_without_location() {
        let renderer = TextRenderer::new();
        let diag = Diagnostic::error("cyclic project reference");
        assert_eq!(renderer.render(&diag), "error: cyclic project reference");
    }

    #[test]
    fn render_with_location() {
        let renderer = TextRenderer::new();
        let diag = Diagnostic::warning("unused reference")
            .with_location(SourceLocation::new("unit.toml", 7, 3));
        let out = renderer.render(&diag);
        assert!(out.starts_with("warning: unused reference"));
        assert!(out.contains("--> unit.toml:7:3"));
    }
}
