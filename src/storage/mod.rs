//! Storage layer for sealcfg
//!
//! The config store is an external collaborator reached through the
//! [`ConfigStore`] trait. Two backends exist: JSON files on local disk and
//! the HTTP config API.

pub mod file_io;
pub mod file_store;
pub mod http_store;

pub use file_io::{read_json, write_json_atomic};
pub use file_store::FileConfigStore;
pub use http_store::HttpConfigStore;

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;

use crate::config::paths::SealPaths;
use crate::config::settings::{Settings, StoreBackend};
use crate::error::SealResult;
use crate::models::TypeInfo;

/// All stored values keyed by config key
pub type ConfigMap = BTreeMap<String, Value>;

/// Type metadata keyed by config key
pub type TypeMap = BTreeMap<String, TypeInfo>;

/// Type metadata as read from a store, before each record is checked
pub type RawTypeMap = BTreeMap<String, Value>;

/// Parse type records one by one
///
/// A record with an unknown type name is dropped with a warning, so that
/// entry falls back to inferred typing instead of failing the whole load.
pub fn parse_type_map(raw: RawTypeMap) -> TypeMap {
    raw.into_iter()
        .filter_map(|(key, record)| match serde_json::from_value::<TypeInfo>(record) {
            Ok(info) => Some((key, info)),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "ignoring unrecognised type record");
                None
            }
        })
        .collect()
}

/// Operations the config store offers
///
/// `save` receives the final text to store: the base64 envelope for sealed
/// tokens, otherwise the raw value as typed.
pub trait ConfigStore {
    /// Fetch every stored value
    fn get_all(&self) -> SealResult<ConfigMap>;

    /// Fetch the type metadata of every entry that has some
    fn get_types(&self) -> SealResult<TypeMap>;

    /// Create or replace an entry
    fn save(&self, key: &str, value: &str, type_info: TypeInfo) -> SealResult<()>;

    /// Remove an entry and its metadata
    fn delete(&self, key: &str) -> SealResult<()>;
}

impl<T: ConfigStore + ?Sized> ConfigStore for Box<T> {
    fn get_all(&self) -> SealResult<ConfigMap> {
        (**self).get_all()
    }

    fn get_types(&self) -> SealResult<TypeMap> {
        (**self).get_types()
    }

    fn save(&self, key: &str, value: &str, type_info: TypeInfo) -> SealResult<()> {
        (**self).save(key, value, type_info)
    }

    fn delete(&self, key: &str) -> SealResult<()> {
        (**self).delete(key)
    }
}

/// Open the store selected in the settings
pub fn open_store(paths: &SealPaths, settings: &Settings) -> SealResult<Box<dyn ConfigStore>> {
    match settings.store.backend {
        StoreBackend::File => {
            tracing::debug!(path = %paths.values_file().display(), "using file config store");
            Ok(Box::new(FileConfigStore::from_paths(paths)))
        }
        StoreBackend::Http => {
            tracing::debug!(url = %settings.store.server_url, "using http config store");
            let store = HttpConfigStore::new(
                &settings.store.server_url,
                Duration::from_secs(settings.store.timeout_secs),
            )?;
            Ok(Box::new(store))
        }
    }
}
