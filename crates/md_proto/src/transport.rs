//! Transport-channel selection and URL construction.
//!
//! Tokens travel as `?doc=` (preferred) or `#doc=` (fallback); the
//! channel is decided purely from encoded token length.

use url::Url;

use crate::codec;
use crate::error::PipelineError;
use crate::limits::{URL_FRAGMENT_LIMIT, URL_PARAM_LIMIT};

/// Which part of a URL carries the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportChannel {
    /// `?doc=` — accepted by every browser, server and unfurler.
    QueryParameter,
    /// `#doc=` — longer, and the fragment never reaches a server.
    Fragment,
    /// Exceeds every transport; encoding must fail upstream.
    Rejected,
}

/// Pick a channel from token length alone.
pub fn select_channel(token: &str) -> TransportChannel {
    match token.len() {
        len if len <= URL_PARAM_LIMIT => TransportChannel::QueryParameter,
        len if len <= URL_FRAGMENT_LIMIT => TransportChannel::Fragment,
        _ => TransportChannel::Rejected,
    }
}

/// Append the percent-escaped token to `base_url` on the given channel.
///
/// # Panics
/// Panics on [`TransportChannel::Rejected`]: the encode path reports
/// `DocumentTooLarge` before URL construction, so reaching this with a
/// rejected token is a caller bug, not a runtime condition.
pub fn build_url(base_url: &str, token: &str, channel: TransportChannel) -> String {
    let escaped = codec::url_escape(token);
    match channel {
        TransportChannel::QueryParameter => format!("{base_url}?doc={escaped}"),
        TransportChannel::Fragment => format!("{base_url}#doc={escaped}"),
        TransportChannel::Rejected => panic!("build_url called with a rejected token"),
    }
}

/// Build a shareable link, choosing the channel from the token length.
pub fn shareable_url(base_url: &str, token: &str) -> Result<String, PipelineError> {
    match select_channel(token) {
        TransportChannel::Rejected => Err(PipelineError::DocumentTooLarge {
            size: token.len(),
            limit: URL_FRAGMENT_LIMIT,
        }),
        channel => Ok(build_url(base_url, token, channel)),
    }
}

/// Pull a `doc` token out of a URL: query string first, then fragment.
///
/// Absence of both is the editor's empty state — `None`, not an error.
/// Values are read from the raw query/fragment text (not form-decoded)
/// so legacy tokens carrying literal `+` survive, then percent-decoded
/// with the tolerance in [`codec::url_unescape`].
pub fn extract_token(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    if let Some(raw) = parsed.query().and_then(find_doc_param) {
        return Some(codec::url_unescape(raw));
    }
    if let Some(raw) = parsed.fragment().and_then(|f| f.strip_prefix("doc=")) {
        return Some(codec::url_unescape(raw));
    }
    None
}

fn find_doc_param(query: &str) -> Option<&str> {
    query.split('&').find_map(|pair| pair.strip_prefix("doc="))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_boundaries() {
        assert_eq!(select_channel(&"a".repeat(1999)), TransportChannel::QueryParameter);
        assert_eq!(select_channel(&"a".repeat(2000)), TransportChannel::QueryParameter);
        assert_eq!(select_channel(&"a".repeat(2001)), TransportChannel::Fragment);
        assert_eq!(select_channel(&"a".repeat(50_000)), TransportChannel::Fragment);
        assert_eq!(select_channel(&"a".repeat(50_001)), TransportChannel::Rejected);
    }

    #[test]
    fn builds_query_and_fragment_urls() {
        let base = "https://md.example/view";
        assert_eq!(
            build_url(base, "abc+/=", TransportChannel::QueryParameter),
            "https://md.example/view?doc=abc%2B%2F%3D"
        );
        assert_eq!(
            build_url(base, "abc", TransportChannel::Fragment),
            "https://md.example/view#doc=abc"
        );
    }

    #[test]
    #[should_panic]
    fn rejected_channel_is_a_caller_bug() {
        build_url("https://md.example", "token", TransportChannel::Rejected);
    }

    #[test]
    fn shareable_url_rejects_oversize_tokens() {
        let err = shareable_url("https://md.example", &"a".repeat(50_001)).unwrap_err();
        assert!(matches!(err, PipelineError::DocumentTooLarge { .. }));
    }

    #[test]
    fn extracts_from_query() {
        let token = extract_token("https://md.example/view?doc=abc%2B%2F%3D").unwrap();
        assert_eq!(token, "abc+/=");
    }

    #[test]
    fn extracts_from_fragment() {
        let token = extract_token("https://md.example/view#doc=SGVsbG8%3D").unwrap();
        assert_eq!(token, "SGVsbG8=");
    }

    #[test]
    fn query_wins_over_fragment() {
        let token = extract_token("https://md.example/?doc=fromquery#doc=fromfragment").unwrap();
        assert_eq!(token, "fromquery");
    }

    #[test]
    fn legacy_unescaped_plus_survives() {
        // Older links embedded raw base64; `+` must not decay to a space.
        let token = extract_token("https://md.example/view?doc=AbC+dEf/gHi=").unwrap();
        assert_eq!(token, "AbC+dEf/gHi=");
    }

    #[test]
    fn absence_is_none() {
        assert_eq!(extract_token("https://md.example/view"), None);
        assert_eq!(extract_token("https://md.example/view?other=1#also"), None);
    }
}
