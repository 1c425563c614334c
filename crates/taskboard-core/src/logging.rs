//! Tracing subscriber setup shared by the binaries.

use std::path::Path;
use tracing_subscriber::EnvFilter;

pub const DEBUG_LOG_ENV: &str = "TASKBOARD_DEBUG_LOG";

/// Where log output should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Warnings and errors to stderr. Used by one-shot CLI commands.
    Stderr,
    /// Nothing unless a debug log file is configured. Used while the TUI owns the terminal.
    Silent,
}

/// Install the global subscriber.
///
/// When `TASKBOARD_DEBUG_LOG` names a file, everything at DEBUG goes there with
/// source locations. `RUST_LOG` overrides the default level either way.
pub fn init_logging(target: LogTarget) -> std::io::Result<()> {
    if let Ok(log_path) = std::env::var(DEBUG_LOG_ENV) {
        return init_file_logging(Path::new(&log_path));
    }

    match target {
        LogTarget::Stderr => {
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogTarget::Silent => {}
    }
    Ok(())
}

fn init_file_logging(path: &Path) -> std::io::Result<()> {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(log_file))
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .try_init();
    Ok(())
}
