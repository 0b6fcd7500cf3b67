use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Raised before compression (document ceiling) and after encoding
    /// (token exceeds every URL transport) — always before any URL or
    /// history mutation.
    #[error("Document too large: {size} exceeds the limit of {limit}")]
    DocumentTooLarge { size: usize, limit: usize },

    #[error("Password protection is not available on this platform")]
    EncryptionUnsupported,

    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    #[error("Corrupt payload: {0}")]
    CorruptPayload(String),

    /// Protection marker present but the envelope record does not parse.
    /// Deliberately distinct from [`PipelineError::AuthenticationFailed`].
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Wrong password, tampered ciphertext, and malformed ciphertext
    /// fields all surface as this one error.
    #[error("incorrect password or corrupted data")]
    AuthenticationFailed,
}
