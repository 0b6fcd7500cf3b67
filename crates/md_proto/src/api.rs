//! Encode/decode facade — the surface the editor and viewer call.
//!
//! Encode: size check → gzip → base64 → optional password envelope →
//! channel selection. Decode runs the mirror image, classifying the
//! token first. Size failures are reported before any URL or history
//! mutation happens on the caller's side.

use tracing::{debug, warn};

use crate::codec;
use crate::compress;
use crate::envelope::{self, TokenKind};
use crate::error::PipelineError;
use crate::limits::{MAX_DOCUMENT_SIZE, URL_FRAGMENT_LIMIT};
use crate::transport::{self, TransportChannel};

/// What the editor gets back from a successful encode.
#[derive(Debug, Clone)]
pub struct EncodeOutcome {
    pub token: String,
    pub channel: TransportChannel,
    /// Character count of the input document.
    pub original_size: usize,
    /// Length of the encoded token.
    pub compressed_size: usize,
    pub password_protected: bool,
}

/// What the viewer gets back from a successful decode.
#[derive(Debug, Clone)]
pub struct DecodeOutcome {
    pub text: String,
    pub password_protected: bool,
}

/// Encode a document into a share token.
pub fn encode(text: &str, password: Option<&str>) -> Result<EncodeOutcome, PipelineError> {
    let original_size = text.chars().count();
    if original_size > MAX_DOCUMENT_SIZE {
        return Err(PipelineError::DocumentTooLarge {
            size: original_size,
            limit: MAX_DOCUMENT_SIZE,
        });
    }

    let encoded = codec::to_text(&compress::compress(text));

    let (token, password_protected) = match password {
        Some(password) => {
            if !md_crypto::is_supported() {
                return Err(PipelineError::EncryptionUnsupported);
            }
            // Compress-then-encrypt: the ciphertext covers the base64 of
            // the gzip stream, not the raw text.
            let payload = md_crypto::encrypt(encoded.as_bytes(), password).map_err(|e| {
                warn!("encryption failed: {e}");
                PipelineError::EncryptionUnsupported
            })?;
            (
                envelope::build_protected_token(&payload.ciphertext, &payload.salt, &payload.nonce),
                true,
            )
        }
        None => (envelope::build_plain_token(encoded), false),
    };

    let compressed_size = token.len();
    let channel = transport::select_channel(&token);
    if channel == TransportChannel::Rejected {
        warn!(token_len = compressed_size, "token exceeds every URL transport");
        return Err(PipelineError::DocumentTooLarge {
            size: compressed_size,
            limit: URL_FRAGMENT_LIMIT,
        });
    }

    debug!(original_size, compressed_size, password_protected, "document encoded");
    Ok(EncodeOutcome {
        token,
        channel,
        original_size,
        compressed_size,
        password_protected,
    })
}

/// Decode a share token back to document text.
///
/// Every failure is recoverable by the caller; `AuthenticationFailed` in
/// particular means "re-prompt for the password", whether the cause was
/// a wrong password, a missing one, or a tampered ciphertext.
pub fn decode(token: &str, password: Option<&str>) -> Result<DecodeOutcome, PipelineError> {
    match envelope::classify(token) {
        TokenKind::Plain => {
            let bytes = codec::from_text(token)?;
            let text = compress::decompress(&bytes)?;
            debug!(chars = text.chars().count(), "plain token decoded");
            Ok(DecodeOutcome {
                text,
                password_protected: false,
            })
        }
        TokenKind::Protected => {
            let record = envelope::parse_protected_token(token)?;
            let password = password.ok_or(PipelineError::AuthenticationFailed)?;

            // Field-level base64 failures are indistinguishable from a
            // wrong password on purpose — no oracle.
            let ciphertext = codec::from_text(&record.encrypted)
                .map_err(|_| PipelineError::AuthenticationFailed)?;
            let salt =
                codec::from_text(&record.salt).map_err(|_| PipelineError::AuthenticationFailed)?;
            let nonce =
                codec::from_text(&record.iv).map_err(|_| PipelineError::AuthenticationFailed)?;

            let encoded = md_crypto::decrypt(&ciphertext, &salt, &nonce, password)
                .map_err(|_| PipelineError::AuthenticationFailed)?;

            // Decrypt yields the base64 of the gzip stream, which is then
            // inflated — never decrypted bytes fed straight to gzip.
            let encoded = String::from_utf8(encoded).map_err(|_| {
                PipelineError::CorruptPayload("decrypted payload is not valid UTF-8".into())
            })?;
            let bytes = codec::from_text(&encoded)?;
            let text = compress::decompress(&bytes)?;
            debug!(chars = text.chars().count(), "protected token decoded");
            Ok(DecodeOutcome {
                text,
                password_protected: true,
            })
        }
    }
}

/// Async [`encode`]. The password path runs its 100k KDF iterations on a
/// blocking worker; the plain path completes inline.
pub async fn encode_async(
    text: String,
    password: Option<String>,
) -> Result<EncodeOutcome, PipelineError> {
    match password {
        None => encode(&text, None),
        Some(_) => tokio::task::spawn_blocking(move || encode(&text, password.as_deref()))
            .await
            .map_err(|e| {
                warn!("encode worker failed: {e}");
                PipelineError::EncryptionUnsupported
            })?,
    }
}

/// Async [`decode`]. The password path runs on a blocking worker.
pub async fn decode_async(
    token: String,
    password: Option<String>,
) -> Result<DecodeOutcome, PipelineError> {
    match envelope::classify(&token) {
        TokenKind::Plain => decode(&token, None),
        TokenKind::Protected => {
            tokio::task::spawn_blocking(move || decode(&token, password.as_deref()))
                .await
                .map_err(|e| {
                    warn!("decode worker failed: {e}");
                    PipelineError::AuthenticationFailed
                })?
        }
    }
}
