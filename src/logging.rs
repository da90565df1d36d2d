//! Tracing subscriber setup.
//!
//! While the key loop owns the terminal, log lines written to stderr would
//! interleave with rendered pages, so a log file can be configured instead.

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::EnvConfig;

const DEFAULT_DIRECTIVES: &str = "warn,hyper=warn,reqwest=warn";
const DEBUG_DIRECTIVES: &str = "debug,hyper=warn,reqwest=warn";

/// Where log output ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(String),
    /// A global subscriber was already installed; nothing changed.
    AlreadyInitialized,
}

/// Filter directives used when `RUST_LOG` is not set.
pub fn default_directives(config: &EnvConfig) -> &'static str {
    if config.debug {
        DEBUG_DIRECTIVES
    } else {
        DEFAULT_DIRECTIVES
    }
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init_logging(config: &EnvConfig) -> io::Result<LogTarget> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config)));

    let (result, target) = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let result = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .try_init();
            (result, LogTarget::File(path.clone()))
        }
        None => {
            let result = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .with_target(true)
                .try_init();
            (result, LogTarget::Stderr)
        }
    };

    match result {
        Ok(()) => Ok(target),
        Err(_) => Ok(LogTarget::AlreadyInitialized),
    }
}
