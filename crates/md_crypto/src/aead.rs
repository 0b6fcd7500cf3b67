//! Authenticated encryption for password-protected share links.
//!
//! AES-256-GCM. Key: PBKDF2 (see `kdf`). Nonce: 12 random bytes.
//! Salt and nonce travel alongside the ciphertext in the share envelope;
//! both are freshly random for every encryption and never reused.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::CryptoError;
use crate::kdf::{derive_key, generate_salt, SALT_LEN};

/// Nonce length in bytes (96-bit GCM nonce).
pub const NONCE_LEN: usize = 12;

/// Output of one password encryption. Raw bytes — the envelope layer
/// base64-encodes each field independently for the wire.
#[derive(Debug, Clone)]
pub struct EncryptedPayload {
    /// Ciphertext with the GCM tag appended.
    pub ciphertext: Vec<u8>,
    /// Per-document PBKDF2 salt.
    pub salt: [u8; SALT_LEN],
    /// Per-document GCM nonce.
    pub nonce: [u8; NONCE_LEN],
}

/// Encrypt `plaintext` under a password-derived key with fresh salt and
/// nonce.
pub fn encrypt(plaintext: &[u8], password: &str) -> Result<EncryptedPayload, CryptoError> {
    let salt = generate_salt();
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let key = derive_key(password, &salt)?;
    let cipher = Aes256Gcm::new_from_slice(key.as_slice()).map_err(|_| CryptoError::Encrypt)?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| CryptoError::Encrypt)?;

    Ok(EncryptedPayload {
        ciphertext,
        salt,
        nonce,
    })
}

/// Decrypt a payload with the password it was encrypted under.
///
/// Every failure mode — wrong password, truncated nonce, flipped
/// ciphertext byte — collapses to [`CryptoError::AuthenticationFailed`]
/// so the error channel cannot be used as a password oracle.
pub fn decrypt(
    ciphertext: &[u8],
    salt: &[u8],
    nonce: &[u8],
    password: &str,
) -> Result<Vec<u8>, CryptoError> {
    if nonce.len() != NONCE_LEN {
        return Err(CryptoError::AuthenticationFailed);
    }
    let key = derive_key(password, salt).map_err(|_| CryptoError::AuthenticationFailed)?;
    let cipher =
        Aes256Gcm::new_from_slice(key.as_slice()).map_err(|_| CryptoError::AuthenticationFailed)?;
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::AuthenticationFailed)
}

/// Async variant of [`encrypt`] — runs the full PBKDF2 iteration count on
/// a blocking worker so an async caller is never stalled.
pub async fn encrypt_async(
    plaintext: Vec<u8>,
    password: String,
) -> Result<EncryptedPayload, CryptoError> {
    tokio::task::spawn_blocking(move || encrypt(&plaintext, &password))
        .await
        .map_err(|e| CryptoError::TaskJoin(e.to_string()))?
}

/// Async variant of [`decrypt`].
pub async fn decrypt_async(
    ciphertext: Vec<u8>,
    salt: Vec<u8>,
    nonce: Vec<u8>,
    password: String,
) -> Result<Vec<u8>, CryptoError> {
    tokio::task::spawn_blocking(move || decrypt(&ciphertext, &salt, &nonce, &password))
        .await
        .map_err(|e| CryptoError::TaskJoin(e.to_string()))?
}

/// Report whether the platform can service password protection.
///
/// The cipher and KDF are compiled in, so the only runtime capability in
/// question is the OS random source used for salts and nonces. Callers
/// must check this before offering the password feature and degrade
/// gracefully when it is false.
pub fn is_supported() -> bool {
    let mut probe = [0u8; 1];
    OsRng.try_fill_bytes(&mut probe).is_ok()
}
