//! Turning change events into shutdown requests.

use std::path::Path;

use crate::shutdown::{ShutdownMode, ShutdownSignal};
use crate::watch::{ChangeNotifier, WatchHandle};

/// Subscribes to file changes under the project root and requests an
/// orderly shutdown for every event.
///
/// The controller only signals intent: it issues one shutdown request per
/// change event over the one-way channel and never restarts the process
/// itself — restart is the supervisor's (or shell's) responsibility. The
/// shutdown mode is configuration passed at construction, not a decision
/// this component makes.
pub struct ReloadController {
    signal: ShutdownSignal,
    mode: ShutdownMode,
}

impl ReloadController {
    /// Creates a controller issuing requests with the given mode.
    pub fn new(signal: ShutdownSignal, mode: ShutdownMode) -> Self {
        Self { signal, mode }
    }

    /// Attaches the controller to a notifier watching `root` recursively.
    ///
    /// The watch lives as long as the returned handle.
    pub fn attach(&self, notifier: &dyn ChangeNotifier, root: &Path) -> WatchHandle {
        let signal = self.signal.clone();
        let mode = self.mode;
        notifier.subscribe(root, Box::new(move || signal.request(mode)))
    }
}
