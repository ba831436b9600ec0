//! Diagnostic logging setup.
//!
//! The terminal UI owns stdout and stderr while it runs, so interactive
//! sessions log to a file (or not at all). The headless `analyze` command
//! logs to stderr. `RUST_LOG` overrides the default level in every case.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Where diagnostic output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    Disabled,
}

impl LogTarget {
    /// TUI sessions only log when a file was requested.
    pub fn for_tui(log_file: Option<PathBuf>) -> Self {
        log_file.map_or(LogTarget::Disabled, LogTarget::File)
    }

    pub fn for_headless(log_file: Option<PathBuf>) -> Self {
        log_file.map_or(LogTarget::Stderr, LogTarget::File)
    }
}

fn env_filter(debug: bool) -> EnvFilter {
    let default_level = if debug { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber. Calling it twice is an error from
/// `tracing-subscriber`, which is reported rather than ignored.
pub fn init_tracing(target: &LogTarget, debug: bool) -> Result<(), Box<dyn std::error::Error>> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .with_target(debug)
        .compact();

    match target {
        LogTarget::Disabled => Ok(()),
        LogTarget::Stderr => builder
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| -> Box<dyn std::error::Error> { err }),
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|err| -> Box<dyn std::error::Error> { err })
        }
    }
}
