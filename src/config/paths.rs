//! Path management for Residual
//!
//! ## Path Resolution Order
//!
//! 1. `RESIDUAL_DATA_DIR` environment variable (if set)
//! 2. The platform config directory from `directories`
//!    (e.g. `~/.config/residual` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::ResidualError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "RESIDUAL_DATA_DIR";

/// Manages all paths used by Residual
#[derive(Debug, Clone)]
pub struct ResidualPaths {
    base_dir: PathBuf,
}

impl ResidualPaths {
    /// Resolve the base directory
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and no
    /// override is set.
    pub fn new() -> Result<Self, ResidualError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("settings.json")
    }

    /// Get the path to the log file
    pub fn log_file(&self) -> PathBuf {
        self.base_dir.join("residual.log")
    }

    pub fn ensure_directories(&self) -> Result<(), ResidualError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| ResidualError::Io(format!("Failed to create base directory: {}", e)))
    }
}

fn resolve_default_path() -> Result<PathBuf, ResidualError> {
    ProjectDirs::from("", "", "residual")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| ResidualError::Config("Could not determine a home directory".into()))
}
