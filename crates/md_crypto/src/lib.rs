//! md_crypto — mdlink password-protection primitives
//!
//! # Design principles
//! - NO custom crypto; all primitives come from audited RustCrypto crates.
//! - Key material is zeroized on drop.
//! - KDF and cipher parameters are wire-format constants: a link
//!   generated today must decrypt in any future version.
//!
//! # Module layout
//! - `kdf`   — PBKDF2-HMAC-SHA256 password key derivation
//! - `aead`  — AES-256-GCM encrypt/decrypt + async wrappers
//! - `error` — unified error type

pub mod aead;
pub mod error;
pub mod kdf;

pub use aead::{decrypt, decrypt_async, encrypt, encrypt_async, is_supported, EncryptedPayload, NONCE_LEN};
pub use error::CryptoError;
pub use kdf::{derive_key, generate_salt, KEY_LEN, PBKDF2_ITERATIONS, SALT_LEN};
