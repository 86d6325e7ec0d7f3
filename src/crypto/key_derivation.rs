//! Key derivation using PBKDF2-HMAC-SHA256
//!
//! Turns a user password and a per-envelope random salt into a 256-bit
//! AES key. The iteration count and hash are fixed so that envelopes
//! produced by other implementations of the same scheme stay readable.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// PBKDF2 iteration count
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Salt length in bytes
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// A derived encryption key, wiped from memory on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive an encryption key from a password and salt
///
/// Deterministic: the same `(password, salt)` pair always yields the same key.
pub fn derive_key(password: &str, salt: &[u8; SALT_LEN]) -> DerivedKey {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key);
    DerivedKey { key }
}

/// Generate a fresh random salt from the OS RNG
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_salt() -> [u8; SALT_LEN] {
        let mut salt = [0u8; SALT_LEN];
        for (i, b) in salt.iter_mut().enumerate() {
            *b = i as u8;
        }
        salt
    }

    #[test]
    fn test_known_answer() {
        // Reference value computed with Python's hashlib.pbkdf2_hmac
        let key = derive_key("correct-horse", &fixed_salt());
        let hex: String = key.as_bytes().iter().map(|b| format!("{:02x}", b)).collect();
        assert_eq!(
            hex,
            "320750f50df8f0086e0cf09e97d0802f5b31754896053352151addbe6a458115"
        );
    }

    #[test]
    fn test_same_password_same_key() {
        let salt = generate_salt();
        let key1 = derive_key("test_password", &salt);
        let key2 = derive_key("test_password", &salt);
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_password_different_key() {
        let salt = generate_salt();
        let key1 = derive_key("password1", &salt);
        let key2 = derive_key("password2", &salt);
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let key1 = derive_key("same_password", &generate_salt());
        let key2 = derive_key("same_password", &generate_salt());
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_salts_are_fresh() {
        assert_ne!(generate_salt(), generate_salt());
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = derive_key("pw", &fixed_salt());
        assert_eq!(format!("{:?}", key), "DerivedKey([REDACTED])");
    }
}
