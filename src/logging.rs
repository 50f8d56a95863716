//! Log setup
//!
//! Logs go to `residual.log` in the data directory, never to the terminal,
//! so the TUI screen stays intact. The filter is read from `RESIDUAL_LOG`
//! (same syntax as `RUST_LOG`) and defaults to `info`.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::ResidualPaths;
use crate::error::{ResidualError, ResidualResult};

pub const LOG_ENV: &str = "RESIDUAL_LOG";
const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber, appending to the log file
pub fn init_logging(paths: &ResidualPaths) -> ResidualResult<()> {
    paths.ensure_directories()?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(paths.log_file())
        .map_err(|e| ResidualError::Io(format!("Failed to open log file: {}", e)))?;

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| ResidualError::Config(format!("Failed to initialise logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_log_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ResidualPaths::with_base_dir(temp_dir.path().join("logs"));

        init_logging(&paths).unwrap();
        tracing::info!("logging initialised");

        assert!(paths.log_file().exists());
    }
}
