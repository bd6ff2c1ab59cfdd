//! Logging setup.
//!
//! Pipelines log through the `log` facade; the host calls [`setup_logging`]
//! once at startup to route records to the pipelinr log file.

use eyre::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Initialize env_logger with file output.
///
/// Log level comes from RUST_LOG; records go to
/// `<data_local_dir>/pipelinr/logs/pipelinr.log`.
pub fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pipelinr")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("pipelinr.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    log::info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}
