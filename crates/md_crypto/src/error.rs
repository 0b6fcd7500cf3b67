use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Encryption failed")]
    Encrypt,

    /// Wrong password and tampered ciphertext are deliberately the same
    /// error — callers must not be able to tell them apart.
    #[error("incorrect password or corrupted data")]
    AuthenticationFailed,

    #[error("Crypto worker task failed: {0}")]
    TaskJoin(String),
}
