//! AES-256-GCM token sealing
//!
//! `encrypt_token` and `decrypt_token` are pure functions over their inputs:
//! every call draws a fresh salt and nonce, and nothing is cached between
//! calls.

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use aes_gcm::aead::rand_core::RngCore;
use zeroize::Zeroizing;

use crate::error::{SealError, SealResult};

use super::envelope::{Envelope, NONCE_LEN};
use super::key_derivation::{derive_key, generate_salt, DerivedKey};

/// Seal `plaintext` with `password` and return the base64 envelope
pub fn encrypt_token(plaintext: &str, password: &str) -> SealResult<String> {
    let salt = generate_salt();
    let key = derive_key(password, &salt);

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let sealed = encrypt_with_key(plaintext.as_bytes(), &key, &nonce)?;

    Ok(Envelope { salt, nonce, sealed }.encode())
}

/// Open a base64 envelope with `password`
///
/// Malformed envelopes, wrong passwords and tampered data all fail with
/// [`SealError::Decryption`].
pub fn decrypt_token(envelope: &str, password: &str) -> SealResult<Zeroizing<String>> {
    let envelope = Envelope::parse(envelope)?;
    let key = derive_key(password, &envelope.salt);

    let plaintext = Zeroizing::new(decrypt_with_key(&envelope.sealed, &key, &envelope.nonce)?);

    // Invalid UTF-8 is treated like any other corruption
    let text = std::str::from_utf8(&plaintext).map_err(|_| SealError::Decryption)?;
    Ok(Zeroizing::new(text.to_owned()))
}

fn encrypt_with_key(
    plaintext: &[u8],
    key: &DerivedKey,
    nonce: &[u8; NONCE_LEN],
) -> SealResult<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| SealError::Encryption(format!("Failed to create cipher: {}", e)))?;

    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|e| SealError::Encryption(format!("Encryption failed: {}", e)))
}

fn decrypt_with_key(
    sealed: &[u8],
    key: &DerivedKey,
    nonce: &[u8; NONCE_LEN],
) -> SealResult<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| SealError::Decryption)?;

    cipher
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| SealError::Decryption)
}
