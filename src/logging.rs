//! Tracing setup
//!
//! `CINEGRID_LOG` takes an `EnvFilter` directive (e.g. `debug` or
//! `cinegrid=trace`). CLI runs log to stderr; the TUI logs to a file so the
//! alternate screen stays clean.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "CINEGRID_LOG";
pub const LOG_FILE: &str = "cinegrid.log";

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to stderr; `quiet` raises the default level to errors only
pub fn init_cli(quiet: bool) {
    let default = if quiet { "error" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(default))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

/// Log to `<data_dir>/cinegrid.log`, returning the file path
pub fn init_tui(data_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(data_dir)?;
    let path = data_dir.join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter("info"))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .try_init();

    Ok(path)
}
