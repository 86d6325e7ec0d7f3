//! sealcfg - key/value configuration with password-sealed tokens
//!
//! This library manages a flat configuration store of typed values (strings,
//! numbers, flags, tokens and key groups). Token values can be sealed with a
//! password into a self-contained base64 envelope using PBKDF2-HMAC-SHA256
//! and AES-256-GCM, and are only ever opened for a single read, edit or copy.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path management and user settings
//! - `error`: Custom error types
//! - `crypto`: Key derivation, envelope format, sealing and opening
//! - `models`: Config types, entry metadata and key groups
//! - `storage`: Config store trait with JSON file and HTTP backends
//! - `services`: Validation, type fallback and the config service
//! - `audit`: Audit logging system
//! - `display`: Terminal formatting with secret masking
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use sealcfg::config::{paths::SealPaths, settings::Settings};
//! use sealcfg::services::ConfigService;
//! use sealcfg::storage::open_store;
//!
//! let paths = SealPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut service = ConfigService::open(open_store(&paths, &settings)?)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{SealError, SealResult};
