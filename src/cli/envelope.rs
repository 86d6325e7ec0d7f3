//! Envelope CLI commands
//!
//! Seals and opens single values without touching the config store.

use clap::Subcommand;

use crate::crypto::{decrypt_token, encrypt_token, Envelope, NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::error::{SealError, SealResult};

use super::password::{prompt_secret, PasswordArgs};

/// Envelope subcommands
#[derive(Subcommand)]
pub enum EnvelopeCommands {
    /// Encrypt a value and print the base64 envelope
    Seal {
        /// Plaintext; prompted for without echo when omitted
        value: Option<String>,
    },
    /// Decrypt an envelope and print the plaintext
    Open {
        /// Base64 envelope
        envelope: String,
    },
    /// Show the layout of an envelope without decrypting it
    Inspect {
        /// Base64 envelope
        envelope: String,
    },
}

/// Handle envelope commands
pub fn handle_envelope_command(passwords: &PasswordArgs, cmd: EnvelopeCommands) -> SealResult<()> {
    match cmd {
        EnvelopeCommands::Seal { value } => {
            let value = match value {
                Some(value) => value.into(),
                None if passwords.no_prompt => {
                    return Err(SealError::Validation(
                        "A value is required when prompting is disabled".into(),
                    ))
                }
                None => prompt_secret("Value: ")?,
            };

            let password = passwords.seal()?.ok_or_else(|| {
                SealError::Precondition("A password is required to seal a value".into())
            })?;

            println!("{}", encrypt_token(&value, &password)?);
        }

        EnvelopeCommands::Open { envelope } => {
            let password = passwords.unlock("envelope")?.ok_or_else(|| {
                SealError::Precondition("A password is required to open an envelope".into())
            })?;

            let plaintext = decrypt_token(envelope.trim(), &password)?;
            println!("{}", plaintext.as_str());
        }

        EnvelopeCommands::Inspect { envelope } => {
            let parsed = Envelope::parse(envelope.trim())?;
            println!("Envelope: {} bytes", parsed.to_bytes().len());
            println!("  Salt:        {} bytes", SALT_LEN);
            println!("  Nonce:       {} bytes", NONCE_LEN);
            println!(
                "  Ciphertext:  {} bytes (plaintext {} + tag {})",
                parsed.sealed.len(),
                parsed.sealed.len() - TAG_LEN,
                TAG_LEN
            );
        }
    }

    Ok(())
}
