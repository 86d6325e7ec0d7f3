//! JSON file config store
//!
//! Values live in `env_config.json`, metadata in `config_types.json`.
//! Every call re-reads the files so edits made by other processes are seen.

use std::path::PathBuf;
use std::sync::Mutex;

use crate::config::paths::SealPaths;
use crate::error::{SealError, SealResult};
use crate::models::TypeInfo;

use super::file_io::{read_json, write_json_atomic};
use super::{parse_type_map, ConfigMap, ConfigStore, RawTypeMap, TypeMap};

/// Config store backed by two JSON files
pub struct FileConfigStore {
    values_path: PathBuf,
    types_path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileConfigStore {
    /// Create a store over explicit file paths
    pub fn new(values_path: PathBuf, types_path: PathBuf) -> Self {
        Self {
            values_path,
            types_path,
            write_lock: Mutex::new(()),
        }
    }

    /// Create a store over the standard data files
    pub fn from_paths(paths: &SealPaths) -> Self {
        Self::new(paths.values_file(), paths.types_file())
    }

    /// Path of the values file
    pub fn values_path(&self) -> &PathBuf {
        &self.values_path
    }

    fn read_types(&self) -> SealResult<TypeMap> {
        let raw: RawTypeMap = read_json(&self.types_path)?;
        Ok(parse_type_map(raw))
    }

    fn validate_key(key: &str) -> SealResult<&str> {
        let key = key.trim();
        if key.is_empty() {
            return Err(SealError::Validation("Key must not be empty".into()));
        }
        Ok(key)
    }
}

impl ConfigStore for FileConfigStore {
    fn get_all(&self) -> SealResult<ConfigMap> {
        read_json(&self.values_path)
    }

    fn get_types(&self) -> SealResult<TypeMap> {
        self.read_types()
    }

    fn save(&self, key: &str, value: &str, type_info: TypeInfo) -> SealResult<()> {
        let key = Self::validate_key(key)?;

        let converted = if type_info.encrypted {
            serde_json::Value::String(value.to_string())
        } else {
            type_info.config_type.convert(value).ok_or_else(|| {
                SealError::Validation(format!(
                    "Cannot convert '{}' to {}",
                    value,
                    type_info.config_type.wire_name()
                ))
            })?
        };

        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| SealError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        // Parse both files before touching either
        let mut values: ConfigMap = read_json(&self.values_path)?;
        let previous_types = self.read_types()?;

        let mut types = previous_types.clone();
        types.insert(key.to_string(), type_info);
        values.insert(key.to_string(), converted);

        // Metadata goes first so an envelope is never on disk without its
        // `encrypted` flag; a failed value write puts the old metadata back
        write_json_atomic(&self.types_path, &types)?;
        if let Err(e) = write_json_atomic(&self.values_path, &values) {
            if let Err(restore) = write_json_atomic(&self.types_path, &previous_types) {
                tracing::error!(key, error = %restore, "failed to restore config types");
            }
            return Err(e);
        }

        tracing::debug!(key, config_type = type_info.config_type.wire_name(), "stored config entry");
        Ok(())
    }

    fn delete(&self, key: &str) -> SealResult<()> {
        let key = Self::validate_key(key)?;

        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| SealError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let mut values: ConfigMap = read_json(&self.values_path)?;
        let mut types = self.read_types()?;
        if values.remove(key).is_none() {
            return Err(SealError::entry_not_found(key));
        }

        // A type record without a value is ignored on load, so values go first
        write_json_atomic(&self.values_path, &values)?;
        if types.remove(key).is_some() {
            write_json_atomic(&self.types_path, &types)?;
        }

        tracing::debug!(key, "removed config entry");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConfigType;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_store() -> (FileConfigStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileConfigStore::new(
            temp_dir.path().join("env_config.json"),
            temp_dir.path().join("config_types.json"),
        );
        (store, temp_dir)
    }

    #[test]
    fn test_empty_store() {
        let (store, _temp) = create_test_store();
        assert!(store.get_all().unwrap().is_empty());
        assert!(store.get_types().unwrap().is_empty());
    }

    #[test]
    fn test_save_converts_by_type() {
        let (store, _temp) = create_test_store();
        store
            .save("threads", "8", TypeInfo::plain(ConfigType::Integer))
            .unwrap();
        store
            .save("debug", "yes", TypeInfo::plain(ConfigType::Boolean))
            .unwrap();
        store
            .save("scale", "0.5", TypeInfo::plain(ConfigType::Float))
            .unwrap();

        let values = store.get_all().unwrap();
        assert_eq!(values["threads"], json!(8));
        assert_eq!(values["debug"], json!(true));
        assert_eq!(values["scale"], json!(0.5));
    }

    #[test]
    fn test_save_records_type_info() {
        let (store, _temp) = create_test_store();
        store
            .save("api_token", "AAAA", TypeInfo::sealed_token())
            .unwrap();

        let types = store.get_types().unwrap();
        assert_eq!(types["api_token"], TypeInfo::sealed_token());
        assert_eq!(store.get_all().unwrap()["api_token"], json!("AAAA"));
    }

    #[test]
    fn test_save_rejects_bad_value() {
        let (store, _temp) = create_test_store();
        let err = store
            .save("threads", "many", TypeInfo::plain(ConfigType::Integer))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_save_rejects_empty_key() {
        let (store, _temp) = create_test_store();
        let err = store
            .save("  ", "x", TypeInfo::plain(ConfigType::String))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_delete() {
        let (store, _temp) = create_test_store();
        store
            .save("name", "value", TypeInfo::plain(ConfigType::String))
            .unwrap();

        store.delete("name").unwrap();
        assert!(store.get_all().unwrap().is_empty());
        assert!(store.get_types().unwrap().is_empty());

        assert!(store.delete("name").unwrap_err().is_not_found());
    }

    #[test]
    fn test_reads_legacy_types_file() {
        let (store, temp) = create_test_store();
        std::fs::write(
            temp.path().join("config_types.json"),
            r#"{"hf_token": "token", "steps": "integer"}"#,
        )
        .unwrap();

        let types = store.get_types().unwrap();
        assert_eq!(types["hf_token"], TypeInfo::plain(ConfigType::Token));
        assert_eq!(types["steps"], TypeInfo::plain(ConfigType::Integer));
    }

    #[test]
    fn test_unreadable_types_file_leaves_values_untouched() {
        let (store, temp) = create_test_store();
        store
            .save("OPENAI_KEY", "sk-ABC123", TypeInfo::plain(ConfigType::Token))
            .unwrap();

        let values_path = temp.path().join("env_config.json");
        let types_path = temp.path().join("config_types.json");
        let values_before = std::fs::read_to_string(&values_path).unwrap();
        let types_before = std::fs::read_to_string(&types_path).unwrap();

        std::fs::write(&types_path, "not json").unwrap();
        let err = store
            .save("OPENAI_KEY", "AAAAsealed", TypeInfo::sealed_token())
            .unwrap_err();
        assert!(matches!(err, SealError::Storage(_)));
        assert_eq!(std::fs::read_to_string(&values_path).unwrap(), values_before);

        assert!(store.delete("OPENAI_KEY").is_err());
        assert_eq!(std::fs::read_to_string(&values_path).unwrap(), values_before);

        std::fs::write(&types_path, types_before).unwrap();
        assert_eq!(store.get_all().unwrap()["OPENAI_KEY"], json!("sk-ABC123"));
        assert_eq!(
            store.get_types().unwrap()["OPENAI_KEY"],
            TypeInfo::plain(ConfigType::Token)
        );
    }

    #[test]
    fn test_failed_value_write_restores_types() {
        let (store, temp) = create_test_store();
        store
            .save("OPENAI_KEY", "sk-ABC123", TypeInfo::plain(ConfigType::Token))
            .unwrap();

        // A directory in place of the temp file makes the values write fail
        std::fs::create_dir(temp.path().join("env_config.json.tmp")).unwrap();
        assert!(store
            .save("OPENAI_KEY", "AAAAsealed", TypeInfo::sealed_token())
            .is_err());

        assert_eq!(store.get_all().unwrap()["OPENAI_KEY"], json!("sk-ABC123"));
        assert_eq!(
            store.get_types().unwrap()["OPENAI_KEY"],
            TypeInfo::plain(ConfigType::Token)
        );
    }

    #[test]
    fn test_unknown_type_names_are_skipped() {
        let (store, temp) = create_test_store();
        std::fs::write(
            temp.path().join("config_types.json"),
            r#"{"steps": "integer", "mystery": "vector3", "odd": {"type": 7}}"#,
        )
        .unwrap();

        let types = store.get_types().unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(types["steps"], TypeInfo::plain(ConfigType::Integer));
    }
}
