//! Password key derivation.
//!
//! PBKDF2-HMAC-SHA256 with a fixed iteration count. The parameters are
//! wire-format constants: a link generated today must still decrypt in
//! any future version, so they cannot change without a new envelope
//! version.

use hmac::Hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// PBKDF2 iteration count. Wire-format constant.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Derive a 32-byte AES key from a password + per-document salt.
/// Zeroized on drop.
pub fn derive_key(password: &str, salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>, CryptoError> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password.as_bytes(), salt, PBKDF2_ITERATIONS, key.as_mut())
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    Ok(key)
}

/// Generate a fresh random 16-byte salt.
///
/// One per encryption, never reused across documents; the salt is not
/// secret and travels in the share envelope.
pub fn generate_salt() -> [u8; SALT_LEN] {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}
