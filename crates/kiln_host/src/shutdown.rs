//! The one-way shutdown request channel.

use std::sync::mpsc;
use std::time::Duration;

/// How the process should go down when a shutdown is requested.
///
/// The mode is a configuration choice made when the signal's consumer is
/// wired up; the reload controller never decides it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ShutdownMode {
    /// Exit as soon as the request is observed.
    Immediate,
    /// Park until a debugger attaches before exiting (development
    /// workflows).
    WaitForDebugger,
}

/// A request for orderly process shutdown.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ShutdownRequest {
    /// The configured shutdown mode.
    pub mode: ShutdownMode,
}

/// Creates the shutdown channel: a cloneable requesting side and the
/// single listening side the host polls at its idle points.
pub fn shutdown_channel() -> (ShutdownSignal, ShutdownListener) {
    let (tx, rx) = mpsc::channel();
    (ShutdownSignal { tx }, ShutdownListener { rx })
}

/// The requesting side of the shutdown channel.
///
/// Sending is fire-and-forget: a request never blocks the sender, and a
/// dropped listener silently swallows it (the process is already going
/// down).
#[derive(Clone)]
pub struct ShutdownSignal {
    tx: mpsc::Sender<ShutdownRequest>,
}

impl ShutdownSignal {
    /// Requests shutdown with the given mode.
    pub fn request(&self, mode: ShutdownMode) {
        let _ = self.tx.send(ShutdownRequest { mode });
    }
}

/// The listening side of the shutdown channel.
///
/// The host never blocks the pipeline on this: it polls during idle points
/// and only parks on [`wait`](Self::wait) once the pipeline is done.
pub struct ShutdownListener {
    rx: mpsc::Receiver<ShutdownRequest>,
}

impl ShutdownListener {
    /// Returns a pending request without blocking.
    pub fn poll(&self) -> Option<ShutdownRequest> {
        self.rx.try_recv().ok()
    }

    /// Blocks until a request arrives. Returns `None` when every signal
    /// has been dropped.
    pub fn wait(&self) -> Option<ShutdownRequest> {
        self.rx.recv().ok()
    }

    /// Blocks up to `timeout` for a request.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<ShutdownRequest> {
        self.rx.recv_timeout(timeout).ok()
    }
}
