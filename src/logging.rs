use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

const LOG_ENV: &str = "T262VIEW_LOG";

/// Send tracing output to a file. The terminal belongs to the UI, so without a
/// file nothing is logged.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let Some(path) = std::env::var_os(LOG_ENV)
        .map(std::path::PathBuf::from)
        .or_else(|| config.file.clone())
    else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();

    Ok(())
}
