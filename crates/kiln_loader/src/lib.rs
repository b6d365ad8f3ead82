//! Loading assembled payloads into the process module table.
//!
//! The loader pipeline turns a payload into a runnable in-process module,
//! surfacing problems as a discriminated load outcome rather than letting
//! the runtime loader raise. A compilation that already failed never
//! reaches a loader variant: its diagnostics become the error outcome
//! directly.

#![warn(missing_docs)]

pub mod module;
pub mod pipeline;

pub use module::{LoadedModule, ModuleTable};
pub use pipeline::{ImageLoader, LoadOutcome, LoaderPipeline, LoaderVariant, RawLoader};
