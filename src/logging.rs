use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

const FILTER_ENV: &str = "STUDYTICK_LOG";
const LOG_FILE: &str = "studytick.log";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// The log file lives next to the database.
pub fn log_path(db_path: &Path) -> PathBuf {
    db_path.with_file_name(LOG_FILE)
}

/// Logging for the TUI: stdout belongs to the terminal UI, so events go to a file.
pub fn init_file(db_path: &Path) -> Result<()> {
    let path = log_path(db_path);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| anyhow!(err))
}

pub fn init_stderr() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_target(false)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
}
