//! Fallback typing for entries without stored metadata
//!
//! Entries written by older tools may have no `{type, encrypted}` record.
//! Keys whose names look like they hold secrets are treated as unencrypted
//! tokens so their values are masked; everything else is typed by the shape
//! of the stored JSON value. This is a heuristic: a key such as
//! `my_token_id` holding a plain number is classified as a token.

use std::sync::OnceLock;

use regex::RegexSet;
use serde_json::Value;

use crate::models::{ConfigType, TypeInfo, TypeSource};

/// Key-name patterns that mark an entry as a secret
pub const SECRET_KEY_PATTERNS: [&str; 11] = [
    "token", "key", "secret", "password", "pwd", "auth", "api_key", "apikey", "_key$",
    "_token$", "_secret$",
];

fn secret_patterns() -> &'static RegexSet {
    static PATTERNS: OnceLock<RegexSet> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        RegexSet::new(SECRET_KEY_PATTERNS.iter().map(|p| format!("(?i){}", p)))
            .expect("valid secret key patterns")
    })
}

/// Whether a key name suggests the value is a secret
pub fn looks_like_secret_key(key: &str) -> bool {
    secret_patterns().is_match(key)
}

/// Guess type metadata for an entry with none recorded
pub fn infer_type_info(key: &str, value: &Value) -> TypeInfo {
    if looks_like_secret_key(key) {
        TypeInfo::plain(ConfigType::Token)
    } else {
        TypeInfo::plain(ConfigType::from_value(value))
    }
}

/// Use the stored metadata when present, otherwise infer it
pub fn resolve_type_info(
    key: &str,
    value: &Value,
    stored: Option<&TypeInfo>,
) -> (TypeInfo, TypeSource) {
    match stored {
        Some(info) => (*info, TypeSource::Stored),
        None => (infer_type_info(key, value), TypeSource::Inferred),
    }
}
