//! Display formatting for terminal output
//!
//! Provides utilities for formatting config entries for terminal display,
//! including tables and masking of secret values.

pub mod entry;

pub use entry::{
    format_entry_details, format_entry_list, format_entry_value, mask_secret, truncate_value,
};
