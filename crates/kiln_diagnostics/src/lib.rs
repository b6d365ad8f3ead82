//! Compiler diagnostics for the Kiln build host.
//!
//! Diagnostics carry a severity, a message, and an optional source location.
//! They decide load eligibility: a compilation result carrying any
//! error-severity diagnostic is never loaded into the process.

#![warn(missing_docs)]

pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use diagnostic::{Diagnostic, SourceLocation};
pub use renderer::{DiagnosticRenderer, TextRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
