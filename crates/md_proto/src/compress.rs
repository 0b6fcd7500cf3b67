//! gzip compression for document payloads.
//!
//! Fixed default level — the output feeds straight into base64, and the
//! stream must stay readable by every past and future version.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::PipelineError;
use crate::limits::MAX_INFLATED_BYTES;

/// Deflate `text` with gzip framing.
///
/// Empty input still produces a small non-empty gzip stream.
pub fn compress(text: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(text.as_bytes())
        .expect("writing to a Vec cannot fail");
    encoder.finish().expect("writing to a Vec cannot fail")
}

/// Inflate a gzip stream back to document text.
pub fn decompress(bytes: &[u8]) -> Result<String, PipelineError> {
    let mut decoder = GzDecoder::new(bytes).take(MAX_INFLATED_BYTES as u64 + 1);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| PipelineError::CorruptPayload(format!("gzip: {e}")))?;
    if out.len() > MAX_INFLATED_BYTES {
        return Err(PipelineError::CorruptPayload(
            "inflated payload exceeds the document size ceiling".into(),
        ));
    }
    String::from_utf8(out)
        .map_err(|_| PipelineError::CorruptPayload("inflated payload is not valid UTF-8".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let text = "# Heading\n\nSome *markdown* body.\n";
        assert_eq!(decompress(&compress(text)).unwrap(), text);
    }

    #[test]
    fn empty_string_roundtrips_through_nonempty_stream() {
        let compressed = compress("");
        assert!(!compressed.is_empty());
        assert_eq!(decompress(&compressed).unwrap(), "");
    }

    #[test]
    fn unicode_roundtrips() {
        let text = "日本語 · émojis 🎉 · עברית";
        assert_eq!(decompress(&compress(text)).unwrap(), text);
    }

    #[test]
    fn garbage_is_corrupt() {
        let err = decompress(b"definitely not gzip").unwrap_err();
        assert!(matches!(err, PipelineError::CorruptPayload(_)));
    }

    #[test]
    fn truncated_stream_is_corrupt() {
        let compressed = compress("some document body that compresses");
        let err = decompress(&compressed[..compressed.len() / 2]).unwrap_err();
        assert!(matches!(err, PipelineError::CorruptPayload(_)));
    }

    #[test]
    fn invalid_utf8_payload_is_corrupt() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&[0xff, 0xfe, 0x80]).unwrap();
        let stream = encoder.finish().unwrap();
        let err = decompress(&stream).unwrap_err();
        assert!(matches!(err, PipelineError::CorruptPayload(_)));
    }
}
