//! `tracing` subscriber setup. `RUST_LOG` takes precedence over the configured
//! filter.

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to the configured file. Used by the terminal UI, which owns stdout.
pub fn init_file(config: &LoggingConfig) -> io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)?;

    // Already initialized (e.g. in tests) is not an error.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config.filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

/// Log to stderr, keeping stdout for command output.
pub fn init_stderr(config: &LoggingConfig) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config.filter))
        .with_writer(io::stderr)
        .try_init();
}
