//! Audit logging for sealcfg
//!
//! Records every confirmed save, delete and unlock in an append-only log.
//! Entries carry the key, type and encryption flag of the affected entry but
//! never its value.
//!
//! # Architecture
//!
//! - `AuditEntry`: one log line with timestamp, operation and entry metadata.
//! - `AuditLogger`: appends entries to a line-delimited JSON file (JSONL) and
//!   subscribes to a `ConfigService` as a `ConfigObserver`.
//!
//! # Example
//!
//! ```rust,ignore
//! use sealcfg::audit::AuditLogger;
//!
//! let mut service = ConfigService::open(store)?;
//! service.subscribe(Box::new(AuditLogger::new(paths.audit_log())));
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
