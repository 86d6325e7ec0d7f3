//! User settings for sealcfg
//!
//! Manages which config store to talk to, whether tokens are sealed by
//! default, and audit logging.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::paths::SealPaths;
use crate::error::SealError;

/// Which config store backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// JSON files in the data directory (default)
    #[default]
    File,
    /// The HTTP config API
    Http,
}

impl StoreBackend {
    /// Parse a backend name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" | "local" => Some(Self::File),
            "http" | "server" | "remote" => Some(Self::Http),
            _ => None,
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Http => write!(f, "http"),
        }
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown store backend '{}' (expected file or http)", s))
    }
}

/// Config store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Base URL of the HTTP config API
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Request timeout for the HTTP backend
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            server_url: default_server_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Encryption settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptionSettings {
    /// Seal token values with a password unless told otherwise
    #[serde(default = "default_true")]
    pub encrypt_tokens: bool,
}

impl Default for EncryptionSettings {
    fn default() -> Self {
        Self {
            encrypt_tokens: true,
        }
    }
}

/// Audit log settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// User settings for sealcfg
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub encryption: EncryptionSettings,

    #[serde(default)]
    pub audit: AuditSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_server_url() -> String {
    "http://127.0.0.1:8188".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            store: StoreSettings::default(),
            encryption: EncryptionSettings::default(),
            audit: AuditSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &SealPaths) -> Result<Self, SealError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| SealError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents)
                .map_err(|e| SealError::Config(format!("Failed to parse settings file: {}", e)))?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &SealPaths) -> Result<(), SealError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| SealError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| SealError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
