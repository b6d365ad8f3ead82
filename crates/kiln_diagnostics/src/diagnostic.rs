//! Diagnostic messages with severity and optional source locations.

use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A position in a source file, as reported by a compiler capability.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SourceLocation {
    /// The source file path.
    pub file: PathBuf,
    /// The 1-based line number.
    pub line: u32,
    /// The 1-based column number.
    pub column: u32,
}

impl SourceLocation {
    /// Creates a location from a file path, line, and column.
    pub fn new(file: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// A compiler-produced message with a severity, used to determine load
/// eligibility.
///
/// Diagnostics are accumulated in the order the compiler produced them and
/// surface verbatim in load-failure blocks — the loader never reorders or
/// filters them.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The main diagnostic message.
    pub message: String,
    /// Where the issue was detected, if the compiler knows.
    pub location: Option<SourceLocation>,
}

impl Diagnostic {
    /// Creates a new error diagnostic with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            location: None,
        }
    }

    /// Creates a new warning diagnostic with the given message.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            location: None,
        }
    }

    /// Creates a new note diagnostic with the given message.
    pub fn note(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Note,
            message: message.into(),
            location: None,
        }
    }

    /// Attaches a source location to this diagnostic.
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}
