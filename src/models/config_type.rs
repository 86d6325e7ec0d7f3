//! Config value types
//!
//! Every stored entry carries an explicit type tag. Values are kept as JSON
//! in the store, so conversion from the raw text a user typed happens here.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Declared type of a config entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigType {
    /// Free text
    String,
    /// Signed 64-bit integer
    Integer,
    /// Floating point number
    Float,
    /// Boolean flag
    Boolean,
    /// Secret value (API token, key); the only type that can be sealed
    Token,
    /// Reference to up to three other keys
    #[serde(rename = "3KeyGroup")]
    KeyGroup,
}

impl ConfigType {
    /// All types, in the order they are offered to users
    pub const ALL: [ConfigType; 6] = [
        Self::String,
        Self::Integer,
        Self::Float,
        Self::Boolean,
        Self::Token,
        Self::KeyGroup,
    ];

    /// Parse a config type from user input or its wire name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "string" | "str" | "text" => Some(Self::String),
            "integer" | "int" => Some(Self::Integer),
            "float" | "number" => Some(Self::Float),
            "boolean" | "bool" => Some(Self::Boolean),
            "token" | "secret" => Some(Self::Token),
            "3keygroup" | "key-group" | "keygroup" | "group" => Some(Self::KeyGroup),
            _ => None,
        }
    }

    /// Name used on the wire and in the types file
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Token => "token",
            Self::KeyGroup => "3KeyGroup",
        }
    }

    /// Whether values of this type may be sealed with a password
    pub fn supports_encryption(&self) -> bool {
        matches!(self, Self::Token)
    }

    /// Convert raw text into the JSON value the store keeps
    ///
    /// Returns `None` when the text cannot be represented as this type.
    pub fn convert(&self, raw: &str) -> Option<Value> {
        match self {
            Self::String | Self::Token | Self::KeyGroup => Some(Value::String(raw.to_string())),
            Self::Integer => raw.trim().parse::<i64>().ok().map(Value::from),
            Self::Float => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::from),
            Self::Boolean => Some(Value::Bool(matches!(
                raw.trim().to_lowercase().as_str(),
                "true" | "1" | "t" | "y" | "yes"
            ))),
        }
    }

    /// Guess a type from the shape of a stored JSON value
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            Value::Number(_) => Self::Float,
            _ => Self::String,
        }
    }
}

impl Default for ConfigType {
    fn default() -> Self {
        Self::String
    }
}

impl fmt::Display for ConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "String"),
            Self::Integer => write!(f, "Integer"),
            Self::Float => write!(f, "Float"),
            Self::Boolean => write!(f, "Boolean"),
            Self::Token => write!(f, "Token/Key"),
            Self::KeyGroup => write!(f, "Key Group"),
        }
    }
}

impl FromStr for ConfigType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            let names: Vec<_> = Self::ALL.iter().map(|t| t.wire_name()).collect();
            format!("unknown type '{}' (expected one of: {})", s, names.join(", "))
        })
    }
}
