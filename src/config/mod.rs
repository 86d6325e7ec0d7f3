//! Configuration module for sealcfg
//!
//! This module provides configuration management including:
//! - platform path resolution
//! - user settings persistence

pub mod paths;
pub mod settings;

pub use paths::SealPaths;
pub use settings::{Settings, StoreBackend};
