//! Share-token envelope — plain vs password-protected.
//!
//! Wire format:
//!   plain token:     base64(gzip(utf8(text)))
//!   protected token: "pw:" + base64(json{encrypted, salt, iv})
//!
//! The ciphertext encrypts the *base64 of the gzip stream*, never the raw
//! document text — decrypt yields base64, which is then gzip-decoded.
//! Field names are the wire contract; previously generated links must
//! keep parsing.

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::PipelineError;

/// Marker prefixing password-protected tokens.
pub const PROTECTED_MARKER: &str = "pw:";

/// Token classification, decided from the prefix alone — O(1), no
/// decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Plain,
    Protected,
}

/// The JSON record inside a protected token. Every field is base64.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectedEnvelope {
    /// AES-GCM ciphertext (tag appended).
    pub encrypted: String,
    /// 16-byte PBKDF2 salt.
    pub salt: String,
    /// 12-byte GCM nonce. Named `iv` on the wire.
    pub iv: String,
}

/// A plain token is the alphabet-encoded compressed payload, unchanged.
pub fn build_plain_token(encoded: String) -> String {
    encoded
}

/// Wrap ciphertext, salt and nonce into a protected token.
pub fn build_protected_token(ciphertext: &[u8], salt: &[u8], nonce: &[u8]) -> String {
    let record = ProtectedEnvelope {
        encrypted: codec::to_text(ciphertext),
        salt: codec::to_text(salt),
        iv: codec::to_text(nonce),
    };
    let json = serde_json::to_string(&record).expect("envelope of strings always serialises");
    format!("{PROTECTED_MARKER}{}", codec::to_text(json.as_bytes()))
}

/// Classify a token by its prefix.
pub fn classify(token: &str) -> TokenKind {
    if token.starts_with(PROTECTED_MARKER) {
        TokenKind::Protected
    } else {
        TokenKind::Plain
    }
}

/// Strip the marker and parse the envelope record.
///
/// A present marker with an unparseable remainder is `MalformedEnvelope`
/// — a reported error distinct from a failed decryption.
pub fn parse_protected_token(token: &str) -> Result<ProtectedEnvelope, PipelineError> {
    let body = token
        .strip_prefix(PROTECTED_MARKER)
        .ok_or_else(|| PipelineError::MalformedEnvelope("protection marker missing".into()))?;
    let raw = codec::from_text(body)
        .map_err(|_| PipelineError::MalformedEnvelope("envelope is not valid base64".into()))?;
    serde_json::from_slice(&raw)
        .map_err(|e| PipelineError::MalformedEnvelope(format!("envelope record: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_prefix() {
        assert_eq!(classify("SGVsbG8="), TokenKind::Plain);
        assert_eq!(classify("pw:SGVsbG8="), TokenKind::Protected);
        assert_eq!(classify(""), TokenKind::Plain);
    }

    #[test]
    fn protected_token_roundtrip() {
        let token = build_protected_token(b"ciphertext-bytes", &[1u8; 16], &[2u8; 12]);
        assert_eq!(classify(&token), TokenKind::Protected);

        let record = parse_protected_token(&token).unwrap();
        assert_eq!(codec::from_text(&record.encrypted).unwrap(), b"ciphertext-bytes");
        assert_eq!(codec::from_text(&record.salt).unwrap(), vec![1u8; 16]);
        assert_eq!(codec::from_text(&record.iv).unwrap(), vec![2u8; 12]);
    }

    #[test]
    fn wire_field_names_are_stable() {
        let token = build_protected_token(b"ct", b"salt", b"iv");
        let json = codec::from_text(token.strip_prefix(PROTECTED_MARKER).unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert!(value.get("encrypted").is_some());
        assert!(value.get("salt").is_some());
        assert!(value.get("iv").is_some());
    }

    #[test]
    fn marker_with_garbage_is_malformed_envelope() {
        let err = parse_protected_token("pw:!!!not-base64!!!").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedEnvelope(_)));
    }

    #[test]
    fn marker_with_wrong_record_is_malformed_envelope() {
        // Valid base64, but the JSON inside is not an envelope record.
        let body = codec::to_text(br#"{"unexpected": true}"#);
        let err = parse_protected_token(&format!("pw:{body}")).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedEnvelope(_)));
    }
}
