//! Core data models for sealcfg
//!
//! Config entries are flat key/value pairs with explicit type metadata.

pub mod config_type;
pub mod entry;
pub mod key_group;

pub use config_type::ConfigType;
pub use entry::{value_to_text, Access, EntryState, EntryView, TypeInfo, TypeSource};
pub use key_group::{KeyGroup, KEY_GROUP_SLOTS};
