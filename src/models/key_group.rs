//! Key groups
//!
//! A key group bundles up to three other config keys so they can be loaded
//! together. It is stored as a JSON string `{"key1":..,"key2":..,"key3":..}`
//! with unused slots set to null.

use serde::{Deserialize, Serialize};

use crate::error::{SealError, SealResult};

/// Number of slots in a key group
pub const KEY_GROUP_SLOTS: usize = 3;

/// References to up to three config keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyGroup {
    pub key1: Option<String>,
    pub key2: Option<String>,
    pub key3: Option<String>,
}

impl KeyGroup {
    /// Build a group from the given keys; blank keys leave the slot empty
    pub fn new<S: AsRef<str>>(keys: &[S]) -> SealResult<Self> {
        if keys.len() > KEY_GROUP_SLOTS {
            return Err(SealError::Validation(format!(
                "A key group holds at most {} keys",
                KEY_GROUP_SLOTS
            )));
        }

        let slot = |i: usize| {
            keys.get(i)
                .map(|k| k.as_ref().trim())
                .filter(|k| !k.is_empty())
                .map(str::to_string)
        };

        Ok(Self {
            key1: slot(0),
            key2: slot(1),
            key3: slot(2),
        })
    }

    /// Parse the stored JSON form
    pub fn parse(raw: &str) -> SealResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| SealError::Validation(format!("Invalid key group: {}", e)))
    }

    /// Serialize to the stored JSON form
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// The three slots in order
    pub fn slots(&self) -> [Option<&str>; KEY_GROUP_SLOTS] {
        [
            self.key1.as_deref().filter(|k| !k.is_empty()),
            self.key2.as_deref().filter(|k| !k.is_empty()),
            self.key3.as_deref().filter(|k| !k.is_empty()),
        ]
    }

    /// The referenced keys, skipping empty slots
    pub fn keys(&self) -> Vec<&str> {
        self.slots().into_iter().flatten().collect()
    }

    /// Validate the group
    ///
    /// At least one key must be set and no key may appear twice.
    pub fn validate(&self) -> SealResult<()> {
        let keys = self.keys();
        if keys.is_empty() {
            return Err(SealError::Validation(
                "Select at least one key for the group".into(),
            ));
        }

        for (i, key) in keys.iter().enumerate() {
            if keys[..i].contains(key) {
                return Err(SealError::Validation(format!(
                    "Key '{}' appears more than once in the group",
                    key
                )));
            }
        }

        Ok(())
    }

    /// Short label such as `[a, b, c]`
    pub fn label(&self) -> String {
        format!("[{}]", self.keys().join(", "))
    }
}
