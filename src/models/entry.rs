//! Config entry metadata and lock state

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::config_type::ConfigType;

/// Per-key metadata kept next to the value: `{type, encrypted}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TypeInfoRepr")]
pub struct TypeInfo {
    #[serde(rename = "type")]
    pub config_type: ConfigType,
    pub encrypted: bool,
}

/// Older types files store a bare type name instead of an object
#[derive(Deserialize)]
#[serde(untagged)]
enum TypeInfoRepr {
    Full {
        #[serde(rename = "type")]
        config_type: ConfigType,
        #[serde(default)]
        encrypted: bool,
    },
    Bare(ConfigType),
}

impl From<TypeInfoRepr> for TypeInfo {
    fn from(repr: TypeInfoRepr) -> Self {
        match repr {
            TypeInfoRepr::Full {
                config_type,
                encrypted,
            } => Self {
                config_type,
                encrypted,
            },
            TypeInfoRepr::Bare(config_type) => Self::plain(config_type),
        }
    }
}

impl TypeInfo {
    /// Metadata for an unencrypted value
    pub fn plain(config_type: ConfigType) -> Self {
        Self {
            config_type,
            encrypted: false,
        }
    }

    /// Metadata for a sealed token
    pub fn sealed_token() -> Self {
        Self {
            config_type: ConfigType::Token,
            encrypted: true,
        }
    }

    /// True when the stored value is an envelope that needs a password
    pub fn is_sealed(&self) -> bool {
        self.encrypted && self.config_type == ConfigType::Token
    }

    /// State of an entry with this metadata before anything is revealed
    pub fn initial_state(&self) -> EntryState {
        if self.is_sealed() {
            EntryState::EncryptedLocked
        } else {
            EntryState::Plain
        }
    }
}

/// Where an entry's type information came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSource {
    /// Recorded by the store when the entry was saved
    Stored,
    /// No metadata existed; guessed from the key name or value shape
    Inferred,
}

/// Lock state of a config entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Stored as-is, readable without a password
    Plain,
    /// Stored as an envelope; plaintext not revealed
    EncryptedLocked,
    /// Envelope opened for a single read, edit or copy
    EncryptedUnlocked,
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::EncryptedLocked => write!(f, "locked"),
            Self::EncryptedUnlocked => write!(f, "unlocked"),
        }
    }
}

/// The kind of access a caller wants to an entry's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Read,
    Edit,
    Copy,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Edit => write!(f, "edit"),
            Self::Copy => write!(f, "copy"),
        }
    }
}

/// Snapshot of one entry for listing
#[derive(Debug, Clone)]
pub struct EntryView {
    pub key: String,
    pub type_info: TypeInfo,
    pub source: TypeSource,
    pub state: EntryState,
    /// The stored value; an envelope for sealed tokens
    pub value: Value,
}

/// Render a stored JSON value the way it would be typed in
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
