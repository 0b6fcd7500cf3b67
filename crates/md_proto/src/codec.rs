//! Binary-to-text codec: base64 for byte payloads, percent-escaping for
//! embedding tokens in URL components.

use base64::{engine::general_purpose, Engine as _};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::error::PipelineError;

/// Characters escaped before a token lands in a URL component.
/// `+`, `/` and `=` are base64 alphabet members that query strings and
/// fragments give other meanings; `&`, `#`, `?` and `%` delimit the URL
/// itself.
const TOKEN_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'+')
    .add(b'/')
    .add(b'=')
    .add(b'&')
    .add(b'#')
    .add(b'?')
    .add(b'%');

/// Encode bytes as base64, standard alphabet, no line wrapping.
pub fn to_text(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode a base64 string produced by [`to_text`].
pub fn from_text(text: &str) -> Result<Vec<u8>, PipelineError> {
    general_purpose::STANDARD
        .decode(text)
        .map_err(|e| PipelineError::MalformedEncoding(e.to_string()))
}

/// Percent-escape a token for embedding in a query or fragment component.
pub fn url_escape(component: &str) -> String {
    utf8_percent_encode(component, TOKEN_ESCAPE).to_string()
}

/// Percent-decode a token taken from a URL.
///
/// Older generated links embedded tokens without percent-encoding. When
/// decoding changes nothing or does not yield UTF-8, the input is
/// returned unchanged so those links keep working. Keep the tolerance
/// here and nowhere else.
pub fn url_unescape(component: &str) -> String {
    match percent_decode_str(component).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => component.to_string(),
    }
}
