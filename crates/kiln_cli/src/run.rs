//! `kiln run` — load the entry module and watch for source changes.
//!
//! Runs the full pipeline to a loaded entry module, then parks on the
//! shutdown listener. A change-triggered shutdown request exits with
//! [`RESTART_EXIT_CODE`] so a supervisor or shell loop can restart the
//! host with a clean cache; restarting is not this process's job.

use std::io::BufRead;
use std::time::Duration;

use kiln_host::{
    shutdown_channel, ChangeNotifier, Host, NoopNotifier, PollingNotifier, ReloadController,
    ShutdownMode,
};

use crate::pipeline::load_project;
use crate::GlobalArgs;

/// Exit code signalling "restart me" to the supervising process.
pub const RESTART_EXIT_CODE: i32 = 3;

/// Runs the `kiln run` command.
///
/// Returns exit code 0 when there is nothing to host or watching is
/// disabled, [`RESTART_EXIT_CODE`] after a change-triggered shutdown
/// request, and 1 on pipeline failure.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (project_dir, config) = load_project(global)?;

    let Some(root) = config.root_identity()? else {
        eprintln!("no root unit configured in kiln.toml");
        return Ok(0);
    };

    let mut host = Host::from_config(&config, &project_dir)?;
    let module = match host.get_entry_point(&root.name) {
        Ok(Some(module)) => module,
        Ok(None) => {
            eprintln!("no root unit configured in kiln.toml");
            return Ok(0);
        }
        Err(e) => {
            eprint!("{e}");
            return Ok(1);
        }
    };

    if !global.quiet {
        eprintln!(
            "   Loaded {} ({} bytes, {} resource(s))",
            module.name,
            module.image_size,
            module.resource_names.len()
        );
    }

    // Wire the reload path: change events become shutdown requests over a
    // one-way channel the host polls, never blocking the pipeline.
    let mode = if config.watch.wait_for_debugger {
        ShutdownMode::WaitForDebugger
    } else {
        ShutdownMode::Immediate
    };
    let notifier: Box<dyn ChangeNotifier> = if config.watch.enabled {
        Box::new(PollingNotifier::new(Duration::from_millis(
            config.watch.poll_interval_ms,
        )))
    } else {
        Box::new(NoopNotifier)
    };

    let (signal, listener) = shutdown_channel();
    let controller = ReloadController::new(signal, mode);
    let _watch = controller.attach(notifier.as_ref(), &project_dir);
    // Only the notifier's callback holds a signal now; with watching
    // disabled the channel closes and wait() returns immediately.
    drop(controller);

    if !global.quiet && config.watch.enabled {
        eprintln!("   Watching {} for changes", project_dir.display());
    }

    match listener.wait() {
        Some(request) => {
            if !global.quiet {
                eprintln!("   Source change detected; shutting down for restart");
            }
            if request.mode == ShutdownMode::WaitForDebugger {
                eprintln!("   Waiting for debugger; press return to exit");
                let mut line = String::new();
                let _ = std::io::stdin().lock().read_line(&mut line);
            }
            Ok(RESTART_EXIT_CODE)
        }
        // Watching disabled: nothing will ever request a shutdown
        None => Ok(0),
    }
}
