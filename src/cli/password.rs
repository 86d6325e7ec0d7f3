//! Password acquisition for CLI commands
//!
//! A password is read per command, either from a named environment variable
//! or from a hidden terminal prompt, and dropped when the command returns.

use clap::Args;
use tracing::debug;

use crate::crypto::SecureString;
use crate::error::{SealError, SealResult};

/// Where commands get their password from
#[derive(Args, Debug, Clone, Default)]
pub struct PasswordArgs {
    /// Read the password from this environment variable instead of prompting
    #[arg(long, global = true, value_name = "VAR")]
    pub password_env: Option<String>,

    /// Never prompt; commands that need a password fail without one
    #[arg(long, global = true)]
    pub no_prompt: bool,
}

impl PasswordArgs {
    /// Password for opening an existing sealed value
    ///
    /// Returns `None` when prompting is disabled and no variable was given;
    /// the service then refuses the operation.
    pub fn unlock(&self, key: &str) -> SealResult<Option<SecureString>> {
        if let Some(password) = self.from_env()? {
            return Ok(Some(password));
        }
        if self.no_prompt {
            return Ok(None);
        }

        prompt_secret(&format!("Password for '{}': ", key)).map(Some)
    }

    /// Password for sealing a new value; prompts twice to confirm
    pub fn seal(&self) -> SealResult<Option<SecureString>> {
        if let Some(password) = self.from_env()? {
            return Ok(Some(password));
        }
        if self.no_prompt {
            return Ok(None);
        }

        prompt_new_password().map(Some)
    }

    fn from_env(&self) -> SealResult<Option<SecureString>> {
        let Some(name) = &self.password_env else {
            return Ok(None);
        };

        match std::env::var(name) {
            Ok(value) => {
                debug!(var = %name, "using password from environment");
                Ok(Some(SecureString::from(value)))
            }
            Err(_) => Err(SealError::Config(format!(
                "Environment variable {} is not set",
                name
            ))),
        }
    }
}

/// Read a secret from the terminal without echo
pub fn prompt_secret(prompt: &str) -> SealResult<SecureString> {
    rpassword::prompt_password(prompt)
        .map(SecureString::from)
        .map_err(|e| SealError::Io(format!("Failed to read input: {}", e)))
}

fn prompt_new_password() -> SealResult<SecureString> {
    loop {
        let pass1 = prompt_secret("Enter encryption password: ")?;

        if pass1.is_empty() {
            println!("Password must not be empty. Please try again.");
            continue;
        }

        let pass2 = prompt_secret("Confirm password: ")?;

        if pass1 != pass2 {
            println!("Passwords do not match. Please try again.");
            continue;
        }

        return Ok(pass1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_from_env() {
        std::env::set_var("SEALCFG_TEST_PASSWORD_A", "correct-horse");
        let args = PasswordArgs {
            password_env: Some("SEALCFG_TEST_PASSWORD_A".into()),
            no_prompt: true,
        };

        assert_eq!(args.unlock("k").unwrap().unwrap().as_str(), "correct-horse");
        assert_eq!(args.seal().unwrap().unwrap().as_str(), "correct-horse");
    }

    #[test]
    fn test_missing_env_var_is_an_error() {
        let args = PasswordArgs {
            password_env: Some("SEALCFG_TEST_PASSWORD_UNSET".into()),
            no_prompt: true,
        };
        assert!(matches!(args.unlock("k"), Err(SealError::Config(_))));
    }

    #[test]
    fn test_no_prompt_yields_none() {
        let args = PasswordArgs {
            password_env: None,
            no_prompt: true,
        };
        assert!(args.unlock("k").unwrap().is_none());
        assert!(args.seal().unwrap().is_none());
    }
}
