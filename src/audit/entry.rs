//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Access, ConfigType, TypeInfo};
use crate::services::ConfigEvent;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Entry was created
    Create,
    /// Entry value was replaced
    Update,
    /// Entry was deleted
    Delete,
    /// A sealed entry was opened
    Unlock,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Unlock => write!(f, "UNLOCK"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// Type of operation performed
    pub operation: Operation,

    /// Config key affected
    pub key: String,

    /// Type of the entry, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_type: Option<ConfigType>,

    /// Whether the stored value is sealed
    #[serde(default)]
    pub encrypted: bool,

    /// What a sealed entry was opened for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<Access>,
}

impl AuditEntry {
    fn new(operation: Operation, key: impl Into<String>, type_info: Option<TypeInfo>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            key: key.into(),
            config_type: type_info.map(|t| t.config_type),
            encrypted: type_info.map(|t| t.encrypted).unwrap_or(false),
            access: None,
        }
    }

    /// Entry for a newly created key
    pub fn create(key: impl Into<String>, type_info: TypeInfo) -> Self {
        Self::new(Operation::Create, key, Some(type_info))
    }

    /// Entry for a replaced value
    pub fn update(key: impl Into<String>, type_info: TypeInfo) -> Self {
        Self::new(Operation::Update, key, Some(type_info))
    }

    /// Entry for a deleted key
    pub fn delete(key: impl Into<String>, type_info: Option<TypeInfo>) -> Self {
        Self::new(Operation::Delete, key, type_info)
    }

    /// Entry for a sealed value opened for `access`
    pub fn unlock(key: impl Into<String>, access: Access) -> Self {
        Self {
            access: Some(access),
            ..Self::new(Operation::Unlock, key, Some(TypeInfo::sealed_token()))
        }
    }

    /// Map a service event to an audit entry; loads are not audited
    pub fn from_event(event: &ConfigEvent) -> Option<Self> {
        match event {
            ConfigEvent::Loaded { .. } => None,
            ConfigEvent::Saved {
                key,
                type_info,
                created: true,
            } => Some(Self::create(key.as_str(), *type_info)),
            ConfigEvent::Saved { key, type_info, .. } => Some(Self::update(key.as_str(), *type_info)),
            ConfigEvent::Deleted { key, type_info } => Some(Self::delete(key.as_str(), *type_info)),
            ConfigEvent::Unlocked { key, access } => Some(Self::unlock(key.as_str(), *access)),
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.key
        );

        if let Some(config_type) = self.config_type {
            output.push_str(&format!(" ({}", config_type));
            if self.encrypted {
                output.push_str(", encrypted");
            }
            output.push(')');
        }

        if let Some(access) = self.access {
            output.push_str(&format!(" for {}", access));
        }

        output
    }
}
