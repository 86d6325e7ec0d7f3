//! Envelope wire format
//!
//! An envelope is `base64(salt || nonce || ciphertext || tag)` using the
//! standard alphabet with padding. Salt and nonce are fixed-size so no
//! length prefixes are needed.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::{SealError, SealResult};

use super::key_derivation::SALT_LEN;

/// AES-GCM nonce length in bytes (96 bits)
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes
pub const TAG_LEN: usize = 16;

/// Smallest decodable envelope: salt, nonce and a tag over an empty plaintext
pub const MIN_ENVELOPE_LEN: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

/// A parsed envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    /// Ciphertext with the authentication tag appended
    pub sealed: Vec<u8>,
}

impl Envelope {
    /// Parse the base64 text form
    ///
    /// Any malformation is reported as [`SealError::Decryption`].
    pub fn parse(text: &str) -> SealResult<Self> {
        let bytes = STANDARD
            .decode(text.trim())
            .map_err(|_| SealError::Decryption)?;
        Self::from_bytes(&bytes)
    }

    /// Split raw envelope bytes into their parts
    pub fn from_bytes(bytes: &[u8]) -> SealResult<Self> {
        if bytes.len() < MIN_ENVELOPE_LEN {
            return Err(SealError::Decryption);
        }

        let (salt, rest) = bytes.split_at(SALT_LEN);
        let (nonce, sealed) = rest.split_at(NONCE_LEN);

        let mut envelope = Self {
            salt: [0u8; SALT_LEN],
            nonce: [0u8; NONCE_LEN],
            sealed: sealed.to_vec(),
        };
        envelope.salt.copy_from_slice(salt);
        envelope.nonce.copy_from_slice(nonce);
        Ok(envelope)
    }

    /// Concatenate the parts in wire order
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(SALT_LEN + NONCE_LEN + self.sealed.len());
        bytes.extend_from_slice(&self.salt);
        bytes.extend_from_slice(&self.nonce);
        bytes.extend_from_slice(&self.sealed);
        bytes
    }

    /// Encode as base64 text
    pub fn encode(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }
}

/// Quick shape check without any key material
///
/// True when `text` decodes to something long enough to be an envelope.
/// It says nothing about whether a password will open it.
pub fn looks_like_envelope(text: &str) -> bool {
    Envelope::parse(text).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Envelope {
        Envelope {
            salt: [1u8; SALT_LEN],
            nonce: [2u8; NONCE_LEN],
            sealed: vec![3u8; TAG_LEN + 5],
        }
    }

    #[test]
    fn test_layout_is_salt_nonce_sealed() {
        let bytes = sample().to_bytes();
        assert_eq!(bytes.len(), SALT_LEN + NONCE_LEN + TAG_LEN + 5);
        assert!(bytes[..16].iter().all(|b| *b == 1));
        assert!(bytes[16..28].iter().all(|b| *b == 2));
        assert!(bytes[28..].iter().all(|b| *b == 3));
    }

    #[test]
    fn test_encode_parse() {
        let envelope = sample();
        let parsed = Envelope::parse(&envelope.encode()).unwrap();
        assert_eq!(parsed, envelope);
    }

    #[test]
    fn test_rejects_non_base64() {
        let err = Envelope::parse("this is not base64 !!!").unwrap_err();
        assert!(err.is_decryption());
    }

    #[test]
    fn test_rejects_short_input() {
        let short = STANDARD.encode([0u8; MIN_ENVELOPE_LEN - 1]);
        assert!(Envelope::parse(&short).unwrap_err().is_decryption());

        let exact = STANDARD.encode([0u8; MIN_ENVELOPE_LEN]);
        assert!(Envelope::parse(&exact).is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(Envelope::parse("").unwrap_err().is_decryption());
    }

    #[test]
    fn test_looks_like_envelope() {
        assert!(looks_like_envelope(&sample().encode()));
        assert!(!looks_like_envelope("sk-ABC123"));
    }
}
