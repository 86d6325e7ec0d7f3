//! Cryptographic functions for sealcfg
//!
//! Provides AES-256-GCM sealing with PBKDF2-HMAC-SHA256 key derivation
//! for token values, and the base64 envelope they are stored in.

pub mod encryption;
pub mod envelope;
pub mod key_derivation;
pub mod secure_memory;

pub use encryption::{decrypt_token, encrypt_token};
pub use envelope::{looks_like_envelope, Envelope, MIN_ENVELOPE_LEN, NONCE_LEN, TAG_LEN};
pub use key_derivation::{derive_key, generate_salt, DerivedKey, KEY_LEN, PBKDF2_ITERATIONS, SALT_LEN};
pub use secure_memory::SecureString;
