//! Compilation for the Kiln build host.
//!
//! The [`Compiler`] capability turns a unit identity into an in-memory
//! binary image plus diagnostics; the [`CompilationCache`] memoizes those
//! results per identity and recursively populates itself for every project
//! reference, so each unit compiles at most once per cache lifetime.
//!
//! The cache never throws compilation failures: failing diagnostics travel
//! inside the result next to a `None` binary, and deciding whether that is
//! fatal belongs to the loader.

#![warn(missing_docs)]

pub mod cache;
pub mod compiler;
pub mod image;
pub mod manifest_compiler;
pub mod result;

pub use cache::CompilationCache;
pub use compiler::{CompileOutput, Compiler};
pub use image::{decode_image, encode_image, ImageError, ImageHeader};
pub use manifest_compiler::ManifestCompiler;
pub use result::{CompilationResult, NeutralArtifact};
