//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod entry;
pub mod envelope;
pub mod password;

pub use entry::{handle_entry_command, EntryCommands};
pub use envelope::{handle_envelope_command, EnvelopeCommands};
pub use password::PasswordArgs;
