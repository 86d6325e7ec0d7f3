//! Value validation
//!
//! Checks the raw text a user typed against the declared type before
//! anything is encrypted or sent to the store.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{SealError, SealResult};
use crate::models::{ConfigType, KeyGroup};

const BOOLEAN_WORDS: [&str; 10] = ["true", "false", "1", "0", "t", "f", "y", "n", "yes", "no"];

fn integer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^-?\d+$").expect("valid integer pattern"))
}

fn float_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^-?\d*\.?\d+([eE][-+]?\d+)?$").expect("valid float pattern")
    })
}

/// Trim a key and reject it if empty
pub fn validate_key(key: &str) -> SealResult<String> {
    let key = key.trim();
    if key.is_empty() {
        return Err(SealError::Validation("Key must not be empty".into()));
    }
    Ok(key.to_string())
}

/// Check that `value` is acceptable for `config_type`
///
/// Error messages never echo token values.
pub fn validate_value(value: &str, config_type: ConfigType) -> SealResult<()> {
    let trimmed = value.trim();

    if trimmed.is_empty() && !matches!(config_type, ConfigType::String | ConfigType::KeyGroup) {
        return Err(SealError::Validation("Value must not be empty".into()));
    }

    match config_type {
        ConfigType::String | ConfigType::Token => Ok(()),
        ConfigType::KeyGroup => KeyGroup::parse(value)?.validate(),
        ConfigType::Integer => {
            if integer_pattern().is_match(trimmed) && trimmed.parse::<i64>().is_ok() {
                Ok(())
            } else {
                Err(SealError::Validation(format!(
                    "\"{}\" is not a valid integer",
                    value
                )))
            }
        }
        ConfigType::Float => {
            if float_pattern().is_match(trimmed) {
                Ok(())
            } else {
                Err(SealError::Validation(format!(
                    "\"{}\" is not a valid float",
                    value
                )))
            }
        }
        ConfigType::Boolean => {
            if BOOLEAN_WORDS.contains(&trimmed.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(SealError::Validation(format!(
                    "\"{}\" is not a valid boolean. Use true/false, 1/0 or yes/no",
                    value
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert_eq!(validate_key("  api_token ").unwrap(), "api_token");
        assert!(validate_key("   ").unwrap_err().is_validation());
    }

    #[test]
    fn test_empty_values() {
        assert!(validate_value("", ConfigType::String).is_ok());
        assert!(validate_value(" ", ConfigType::Token).is_err());
        assert!(validate_value("", ConfigType::Integer).is_err());
        assert!(validate_value("", ConfigType::Boolean).is_err());
    }

    #[test]
    fn test_integers() {
        assert!(validate_value("42", ConfigType::Integer).is_ok());
        assert!(validate_value(" -7 ", ConfigType::Integer).is_ok());
        assert!(validate_value("4.2", ConfigType::Integer).is_err());
        assert!(validate_value("1e3", ConfigType::Integer).is_err());
        assert!(validate_value("99999999999999999999", ConfigType::Integer).is_err());
    }

    #[test]
    fn test_floats() {
        assert!(validate_value("0.5", ConfigType::Float).is_ok());
        assert!(validate_value(".5", ConfigType::Float).is_ok());
        assert!(validate_value("-3", ConfigType::Float).is_ok());
        assert!(validate_value("6.02e23", ConfigType::Float).is_ok());
        assert!(validate_value("1.", ConfigType::Float).is_err());
        assert!(validate_value("NaN", ConfigType::Float).is_err());
    }

    #[test]
    fn test_booleans() {
        for word in ["true", "FALSE", "Yes", "n", "0"] {
            assert!(validate_value(word, ConfigType::Boolean).is_ok(), "{}", word);
        }
        assert!(validate_value("maybe", ConfigType::Boolean).is_err());
    }

    #[test]
    fn test_key_groups() {
        let ok = KeyGroup::new(&["a", "b"]).unwrap().to_json();
        assert!(validate_value(&ok, ConfigType::KeyGroup).is_ok());

        let dup = KeyGroup::new(&["a", "a"]).unwrap().to_json();
        assert!(validate_value(&dup, ConfigType::KeyGroup).is_err());

        assert!(validate_value("", ConfigType::KeyGroup).is_err());
    }

    #[test]
    fn test_token_error_does_not_echo_value() {
        let err = validate_value("   ", ConfigType::Token).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Value must not be empty");
    }
}
