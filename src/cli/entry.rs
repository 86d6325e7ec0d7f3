//! Config entry CLI commands
//!
//! Implements the commands that read and change config entries.

use std::io::Write;

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::crypto::SecureString;
use crate::display::{format_entry_details, format_entry_list};
use crate::error::{SealError, SealResult};
use crate::models::{Access, ConfigType, EntryState};
use crate::services::ConfigService;
use crate::storage::ConfigStore;

use super::password::{prompt_secret, PasswordArgs};

/// Entry subcommands
#[derive(Subcommand)]
pub enum EntryCommands {
    /// List all entries with secrets masked
    #[command(alias = "ls")]
    List,
    /// Show an entry's type and lock state
    Show {
        /// Config key
        key: String,
    },
    /// Print an entry's value
    Get {
        /// Config key
        key: String,
    },
    /// Print the text that would be copied for an entry
    Copy {
        /// Config key
        key: String,
    },
    /// Create or replace an entry
    Set {
        /// Config key
        key: String,
        /// New value; prompted for without echo when omitted
        value: Option<String>,
        /// Value type (string, integer, float, boolean, token)
        #[arg(short = 't', long = "type", default_value = "string")]
        config_type: ConfigType,
        /// Store a token without encrypting it
        #[arg(long)]
        plain: bool,
    },
    /// Change the value of an existing entry, keeping its type
    Edit {
        /// Config key
        key: String,
        /// New value; prompted for without echo when omitted
        value: Option<String>,
        /// Store a token without encrypting it
        #[arg(long)]
        plain: bool,
    },
    /// Create a key group bundling up to three existing keys
    Group {
        /// Config key for the group
        key: String,
        /// Keys to include
        #[arg(required = true, num_args = 1..=3)]
        members: Vec<String>,
    },
    /// Print the values a key group points at
    GroupValues {
        /// Config key of the group
        key: String,
    },
    /// Delete an entry
    #[command(alias = "rm")]
    Delete {
        /// Config key
        key: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle an entry command
pub fn handle_entry_command<S: ConfigStore>(
    service: &mut ConfigService<S>,
    settings: &Settings,
    passwords: &PasswordArgs,
    cmd: EntryCommands,
) -> SealResult<()> {
    match cmd {
        EntryCommands::List => {
            println!("{}", format_entry_list(&service.entries()).trim_end());
        }

        EntryCommands::Show { key } => {
            let entry = service
                .entry(&key)
                .ok_or_else(|| SealError::entry_not_found(&key))?;
            print!("{}", format_entry_details(&entry));
        }

        EntryCommands::Get { key } => {
            let password = unlock_password(service, passwords, &key)?;
            let revealed = service.reveal(&key, Access::Read, password.as_ref())?;
            println!("{}", revealed.value.as_str());
        }

        EntryCommands::Copy { key } => {
            let is_group = matches!(
                service.type_info(&key),
                Some((info, _)) if info.config_type == ConfigType::KeyGroup
            );
            let password = if is_group {
                None
            } else {
                unlock_password(service, passwords, &key)?
            };

            let text = service.copy_value(&key, password.as_ref())?;
            println!("{}", text.as_str());
        }

        EntryCommands::Set {
            key,
            value,
            config_type,
            plain,
        } => {
            let value = read_value(value, passwords)?;
            let encrypt = config_type.supports_encryption()
                && !plain
                && settings.encryption.encrypt_tokens;
            let password = if encrypt { passwords.seal()? } else { None };

            let info = service.save(&key, &value, config_type, encrypt, password.as_ref())?;
            println!(
                "Saved '{}' ({}{})",
                key.trim(),
                info.config_type,
                if info.encrypted { ", encrypted" } else { "" }
            );
        }

        EntryCommands::Edit { key, value, plain } => {
            let (type_info, _) = service
                .type_info(&key)
                .ok_or_else(|| SealError::entry_not_found(&key))?;

            let value = read_value(value, passwords)?;
            let encrypt = type_info.config_type.supports_encryption()
                && !plain
                && (type_info.encrypted || settings.encryption.encrypt_tokens);

            // A sealed entry is unlocked and resealed with the same password
            let password = if type_info.is_sealed() {
                passwords.unlock(&key)?
            } else if encrypt {
                passwords.seal()?
            } else {
                None
            };

            let info = service.update(&key, &value, encrypt, password.as_ref())?;
            println!(
                "Updated '{}' ({}{})",
                key,
                info.config_type,
                if info.encrypted { ", encrypted" } else { "" }
            );
        }

        EntryCommands::Group { key, members } => {
            service.save_key_group(&key, members.as_slice())?;
            let group = service.key_group(key.trim())?;
            println!("Saved key group '{}' {}", key.trim(), group.label());
        }

        EntryCommands::GroupValues { key } => {
            let group = service.key_group(&key)?;
            let needs_password = group
                .keys()
                .iter()
                .any(|member| service.state(member) == Some(EntryState::EncryptedLocked));
            let password = if needs_password {
                passwords.unlock(&key)?
            } else {
                None
            };

            let values = service.resolve_key_group(&key, password.as_ref())?;
            for (slot, value) in group.slots().iter().zip(values.iter()) {
                if let Some(member) = slot {
                    println!("{}: {}", member, value.as_str());
                }
            }
        }

        EntryCommands::Delete { key, force } => {
            if !service.contains(&key) {
                return Err(SealError::entry_not_found(&key));
            }

            if !force && !confirm(&format!("Delete '{}'? (yes/no): ", key))? {
                println!("Aborted.");
                return Ok(());
            }

            service.delete(&key)?;
            println!("Deleted '{}'", key);
        }
    }

    Ok(())
}

/// Ask for a password only when the entry is sealed
fn unlock_password<S: ConfigStore>(
    service: &ConfigService<S>,
    passwords: &PasswordArgs,
    key: &str,
) -> SealResult<Option<SecureString>> {
    if service.state(key) == Some(EntryState::EncryptedLocked) {
        passwords.unlock(key)
    } else {
        Ok(None)
    }
}

fn read_value(value: Option<String>, passwords: &PasswordArgs) -> SealResult<SecureString> {
    match value {
        Some(value) => Ok(SecureString::from(value)),
        None if passwords.no_prompt => Err(SealError::Validation(
            "A value is required when prompting is disabled".into(),
        )),
        None => prompt_secret("Value: "),
    }
}

fn confirm(prompt: &str) -> SealResult<bool> {
    print!("{}", prompt);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
