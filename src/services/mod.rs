//! Service layer for sealcfg
//!
//! The service layer sits on top of a config store, handling validation,
//! type fallback, sealing of tokens and change notification.

pub mod config;
pub mod events;
pub mod type_inference;
pub mod validation;

pub use config::{ConfigService, Revealed};
pub use events::{ConfigEvent, ConfigObserver, EventBus};
pub use type_inference::{infer_type_info, looks_like_secret_key, resolve_type_info};
pub use validation::{validate_key, validate_value};
