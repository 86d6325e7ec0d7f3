//! Path management for sealcfg
//!
//! ## Path Resolution Order
//!
//! 1. `SEALCFG_DATA_DIR` environment variable (if set)
//! 2. The platform config directory (`~/.config/sealcfg` on Linux,
//!    `~/Library/Application Support/sealcfg` on macOS, `%APPDATA%\sealcfg`
//!    on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::SealError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "SEALCFG_DATA_DIR";

/// Manages all paths used by sealcfg
#[derive(Debug, Clone)]
pub struct SealPaths {
    /// Base directory for all sealcfg files
    base_dir: PathBuf,
}

impl SealPaths {
    /// Create a new SealPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, SealError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create SealPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory holding the file store
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to env_config.json (stored values)
    pub fn values_file(&self) -> PathBuf {
        self.data_dir().join("env_config.json")
    }

    /// Get the path to config_types.json (type metadata)
    pub fn types_file(&self) -> PathBuf {
        self.data_dir().join("config_types.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), SealError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| SealError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| SealError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if sealcfg has been initialized (settings file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, SealError> {
    ProjectDirs::from("", "", "sealcfg")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| SealError::Config("Could not determine a config directory".into()))
}
