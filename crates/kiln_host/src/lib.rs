//! The Kiln host: entry-point resolution and live reload.
//!
//! The host wires the pipeline together — resolve the dependency graph,
//! compile through the cache, assemble the payload, load the entry module —
//! and runs a reload controller beside it that turns file-change events
//! into orderly shutdown requests. All collaborators arrive through
//! constructor injection; there is no ambient service registry.

#![warn(missing_docs)]

pub mod error;
pub mod host;
pub mod reload;
pub mod report;
pub mod shutdown;
pub mod watch;

pub use error::HostError;
pub use host::{Host, HostState};
pub use reload::ReloadController;
pub use report::{format_load_failure, format_unresolved_report, REMEDIATION_HINT};
pub use shutdown::{shutdown_channel, ShutdownListener, ShutdownMode, ShutdownRequest, ShutdownSignal};
pub use watch::{ChangeNotifier, NoopNotifier, PollingNotifier, WatchHandle};
