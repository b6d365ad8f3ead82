//! File-change notification capabilities.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use kiln_common::ContentHash;

/// A capability delivering file-change events for a directory tree.
///
/// Delivery is at-least-once; the callback carries no file identity because
/// any event triggers the same shutdown path.
pub trait ChangeNotifier {
    /// Starts watching `root` recursively, invoking `on_change` on every
    /// observed change until the returned handle is stopped or dropped.
    fn subscribe(&self, root: &Path, on_change: Box<dyn Fn() + Send>) -> WatchHandle;
}

/// Handle to an active subscription. Stopping (or dropping) it ends the
/// watch and joins any background thread.
pub struct WatchHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl WatchHandle {
    /// A handle with nothing behind it, used by the no-op notifier.
    pub fn detached() -> Self {
        Self {
            stop: Arc::new(AtomicBool::new(true)),
            thread: None,
        }
    }

    /// Stops the subscription and waits for its thread to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Installed when file watching is disabled by configuration: no event
/// ever fires and the rest of the pipeline is unaffected.
pub struct NoopNotifier;

impl ChangeNotifier for NoopNotifier {
    fn subscribe(&self, _root: &Path, _on_change: Box<dyn Fn() + Send>) -> WatchHandle {
        WatchHandle::detached()
    }
}

/// Polls the directory tree on a background thread, comparing content-hash
/// snapshots between rounds.
///
/// Added, removed, and modified files all register as a change. Unreadable
/// files are skipped fail-safe. Debouncing and OS watch APIs stay outside
/// this capability.
pub struct PollingNotifier {
    interval: Duration,
}

impl PollingNotifier {
    /// Creates a notifier polling at the given cadence.
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    fn snapshot(root: &Path) -> HashMap<PathBuf, ContentHash> {
        let mut files = HashMap::new();
        scan_dir(root, &mut files);
        files
    }
}

/// Recursively hashes every readable file under `dir`.
fn scan_dir(dir: &Path, files: &mut HashMap<PathBuf, ContentHash>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan_dir(&path, files);
        } else if let Ok(bytes) = std::fs::read(&path) {
            files.insert(path, ContentHash::from_bytes(&bytes));
        }
    }
}

impl ChangeNotifier for PollingNotifier {
    fn subscribe(&self, root: &Path, on_change: Box<dyn Fn() + Send>) -> WatchHandle {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let root = root.to_path_buf();
        let interval = self.interval;

        let thread = std::thread::spawn(move || {
            let mut previous = PollingNotifier::snapshot(&root);
            while !thread_stop.load(Ordering::Relaxed) {
                std::thread::sleep(interval);
                if thread_stop.load(Ordering::Relaxed) {
                    break;
                }
                let current = PollingNotifier::snapshot(&root);
                if current != previous {
                    previous = current;
                    on_change();
                }
            }
        });

        WatchHandle {
            stop,
            thread: Some(thread),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn event_channel() -> (Box<dyn Fn() + Send>, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel();
        (Box::new(move || drop(tx.send(()))), rx)
    }

    #[test]
    fn noop_notifier_never_fires() {
        let tmp = tempfile::tempdir().unwrap();
        let (on_change, events) = event_channel();

        let handle = NoopNotifier.subscribe(tmp.path(), on_change);
        std::fs::write(tmp.path().join("a.ks"), "changed").unwrap();
        assert!(events.recv_timeout(Duration::from_millis(200)).is_err());
        handle.stop();
    }

    #[test]
    fn polling_notifier_sees_modified_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("a.ks");
        std::fs::write(&file, "original").unwrap();

        let notifier = PollingNotifier::new(Duration::from_millis(20));
        let (on_change, events) = event_channel();
        let handle = notifier.subscribe(tmp.path(), on_change);

        // Let the initial snapshot land before mutating the tree
        std::thread::sleep(Duration::from_millis(200));
        std::fs::write(&file, "modified").unwrap();
        assert!(
            events.recv_timeout(Duration::from_secs(5)).is_ok(),
            "expected a change event"
        );
        handle.stop();
    }

    #[test]
    fn polling_notifier_sees_new_file() {
        let tmp = tempfile::tempdir().unwrap();

        let notifier = PollingNotifier::new(Duration::from_millis(20));
        let (on_change, events) = event_channel();
        let handle = notifier.subscribe(tmp.path(), on_change);

        std::thread::sleep(Duration::from_millis(200));
        std::fs::write(tmp.path().join("new.ks"), "fresh").unwrap();
        assert!(events.recv_timeout(Duration::from_secs(5)).is_ok());
        handle.stop();
    }

    #[test]
    fn polling_notifier_sees_nested_change() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("src/deep");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("mod.ks"), "v1").unwrap();

        let notifier = PollingNotifier::new(Duration::from_millis(20));
        let (on_change, events) = event_channel();
        let handle = notifier.subscribe(tmp.path(), on_change);

        std::thread::sleep(Duration::from_millis(200));
        std::fs::write(nested.join("mod.ks"), "v2").unwrap();
        assert!(events.recv_timeout(Duration::from_secs(5)).is_ok());
        handle.stop();
    }

    #[test]
    fn quiet_tree_stays_quiet() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.ks"), "stable").unwrap();

        let notifier = PollingNotifier::new(Duration::from_millis(20));
        let (on_change, events) = event_channel();
        let handle = notifier.subscribe(tmp.path(), on_change);

        assert!(events.recv_timeout(Duration::from_millis(200)).is_err());
        handle.stop();
    }
}
