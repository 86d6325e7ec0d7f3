//! Config entry display formatting
//!
//! Formats entries for terminal output in table and detail views. Token
//! values are always masked; nothing here ever decrypts.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{value_to_text, ConfigType, EntryState, EntryView, KeyGroup, TypeSource};

/// Longest plain value shown in a listing before it is cut
pub const MAX_VALUE_WIDTH: usize = 40;

/// Longest mask shown for a secret
pub const MAX_MASK_WIDTH: usize = 12;

/// Replace a secret with `*`, one per character up to [`MAX_MASK_WIDTH`]
pub fn mask_secret(secret: &str) -> String {
    "*".repeat(secret.chars().count().min(MAX_MASK_WIDTH))
}

/// Shorten a value to [`MAX_VALUE_WIDTH`] characters plus `...`
pub fn truncate_value(value: &str) -> String {
    if value.chars().count() <= MAX_VALUE_WIDTH {
        value.to_string()
    } else {
        let head: String = value.chars().take(MAX_VALUE_WIDTH).collect();
        format!("{}...", head)
    }
}

/// The value column of an entry: masked, summarised or truncated
pub fn format_entry_value(entry: &EntryView) -> String {
    let text = value_to_text(&entry.value);

    match entry.type_info.config_type {
        ConfigType::Token => mask_secret(&text),
        ConfigType::KeyGroup => KeyGroup::parse(&text)
            .map(|group| group.label())
            .unwrap_or_else(|_| truncate_value(&text)),
        _ => truncate_value(&text),
    }
}

fn format_type(entry: &EntryView) -> String {
    match entry.source {
        TypeSource::Stored => entry.type_info.config_type.to_string(),
        TypeSource::Inferred => format!("{} (inferred)", entry.type_info.config_type),
    }
}

fn format_status(entry: &EntryView) -> &'static str {
    match entry.state {
        EntryState::EncryptedLocked => "encrypted",
        EntryState::EncryptedUnlocked => "unlocked",
        EntryState::Plain => "",
    }
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Type")]
    config_type: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

/// Format a list of entries as a table
pub fn format_entry_list(entries: &[EntryView]) -> String {
    if entries.is_empty() {
        return "No config entries found.".to_string();
    }

    let rows: Vec<EntryRow> = entries
        .iter()
        .map(|entry| EntryRow {
            key: entry.key.clone(),
            config_type: format_type(entry),
            value: format_entry_value(entry),
            status: format_status(entry),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::psql());

    format!("{}\n{} entries\n", table, entries.len())
}

/// Format a single entry's details
pub fn format_entry_details(entry: &EntryView) -> String {
    let mut output = String::new();

    output.push_str(&format!("Key: {}\n", entry.key));
    output.push_str(&format!("  Type:       {}\n", format_type(entry)));
    output.push_str(&format!(
        "  Encrypted:  {}\n",
        if entry.type_info.encrypted { "Yes" } else { "No" }
    ));
    output.push_str(&format!("  State:      {}\n", entry.state));
    output.push_str(&format!("  Value:      {}\n", format_entry_value(entry)));

    output
}
