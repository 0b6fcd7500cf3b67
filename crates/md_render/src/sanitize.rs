//! Allow-list HTML sanitizer — the XSS defense boundary.
//!
//! A token-level filter over rendered HTML. Tags outside the allow-list
//! are stripped, not escaped-and-shown; containers whose content is
//! itself executable (script, style, …) lose their content too.
//! Attributes outside the allow-list are dropped, and URL-carrying
//! attributes must pass a scheme check. The allow-list travels in
//! [`RenderOptions`] and never contains a script-execution vector.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::options::RenderOptions;

/// Tags whose entire content is dropped along with the tag.
const DROP_CONTENT: &[&str] = &[
    "script", "style", "iframe", "noscript", "object", "embed", "template",
];

/// Attributes whose value is a URL.
const URL_ATTRS: &[&str] = &["href", "src"];

struct RawTag<'a> {
    name: &'a str,
    attrs: Vec<(String, Option<String>)>,
    closing: bool,
    self_closing: bool,
    /// Byte length of the tag including the final `>`.
    len: usize,
}

/// Filter `html` against the allow-list in `options`.
pub fn sanitize(html: &str, options: &RenderOptions) -> String {
    let mut out = String::with_capacity(html.len());
    let mut pos = 0;
    while let Some(lt) = html[pos..].find('<').map(|i| pos + i) {
        out.push_str(&html[pos..lt]);
        if html[lt..].starts_with("<!--") {
            pos = html[lt..]
                .find("-->")
                .map(|i| lt + i + 3)
                .unwrap_or(html.len());
            continue;
        }
        match parse_tag(&html[lt..]) {
            Some(tag) => {
                let after = lt + tag.len;
                let name = tag.name.to_ascii_lowercase();
                if tag.closing {
                    if options.allowed_tags.contains(&name) {
                        out.push_str("</");
                        out.push_str(&name);
                        out.push('>');
                    }
                    pos = after;
                } else if options.allowed_tags.contains(&name) {
                    emit_tag(&mut out, &name, &tag, options);
                    pos = after;
                } else if DROP_CONTENT.contains(&name.as_str()) {
                    pos = skip_past_close(html, after, &name);
                } else {
                    // Unknown tag: drop the markup, keep the content.
                    pos = after;
                }
            }
            None => {
                // `<` that does not open a tag — show it as text.
                out.push_str("&lt;");
                pos = lt + 1;
            }
        }
    }
    out.push_str(&html[pos..]);
    out
}

fn parse_tag(input: &str) -> Option<RawTag<'_>> {
    let bytes = input.as_bytes();
    let mut i = 1;
    let closing = bytes.get(i) == Some(&b'/');
    if closing {
        i += 1;
    }
    let name_start = i;
    while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
        i += 1;
    }
    if i == name_start {
        return None;
    }
    let name = &input[name_start..i];

    let mut attrs = Vec::new();
    let mut self_closing = false;
    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let c = *bytes.get(i)?;
        if c == b'>' {
            i += 1;
            break;
        }
        if c == b'/' {
            self_closing = true;
            i += 1;
            continue;
        }

        let attr_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && !matches!(bytes[i], b'=' | b'>' | b'/')
        {
            i += 1;
        }
        if i == attr_start {
            return None;
        }
        let attr_name = input[attr_start..i].to_ascii_lowercase();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let value = if bytes.get(i) == Some(&b'=') {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            let q = *bytes.get(i)?;
            if q == b'"' || q == b'\'' {
                i += 1;
                let value_start = i;
                while i < bytes.len() && bytes[i] != q {
                    i += 1;
                }
                if i >= bytes.len() {
                    return None;
                }
                let v = input[value_start..i].to_string();
                i += 1;
                Some(v)
            } else {
                let value_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                    i += 1;
                }
                Some(input[value_start..i].to_string())
            }
        } else {
            None
        };
        attrs.push((attr_name, value));
    }

    Some(RawTag {
        name,
        attrs,
        closing,
        self_closing,
        len: i,
    })
}

fn emit_tag(out: &mut String, name: &str, tag: &RawTag, options: &RenderOptions) {
    out.push('<');
    out.push_str(name);
    for (attr, value) in &tag.attrs {
        if !options.allowed_attrs.contains(attr) {
            continue;
        }
        if URL_ATTRS.contains(&attr.as_str()) && !value.as_deref().is_some_and(safe_url) {
            continue;
        }
        out.push(' ');
        out.push_str(attr);
        if let Some(v) = value {
            out.push_str("=\"");
            out.push_str(&v.replace('"', "&quot;"));
            out.push('"');
        }
    }
    if tag.self_closing {
        out.push_str(" /");
    }
    out.push('>');
}

/// Accept relative URLs, fragments, and http/https/mailto. Everything
/// else — including entity-smuggled scheme separators — is dropped.
fn safe_url(value: &str) -> bool {
    let cleaned: String = value
        .chars()
        .filter(|c| !c.is_control() && !c.is_whitespace())
        .collect();
    let cleaned = cleaned.to_ascii_lowercase();
    // Only the region before the first path delimiter can hold a scheme.
    let head = cleaned
        .split(|c| matches!(c, '/' | '?' | '#'))
        .next()
        .unwrap_or("");
    if head.contains("&#") || head.contains("&colon") {
        return false;
    }
    match head.find(':') {
        None => true,
        Some(colon) => matches!(&head[..colon], "http" | "https" | "mailto"),
    }
}

static DANGEROUS_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    let pairs = DROP_CONTENT
        .iter()
        .map(|t| format!(r"<{t}\b[^>]*>.*?</{t}\s*>"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?is)(?:{pairs})")).unwrap()
});

static DANGEROUS_TAG: Lazy<Regex> = Lazy::new(|| {
    let names = DROP_CONTENT.join("|");
    Regex::new(&format!(r"(?i)</?(?:{names})\b[^>]*>")).unwrap()
});

/// Remove script-class elements from markdown prose before parsing.
///
/// A raw `<script>` line starts a CommonMark HTML block that swallows
/// the rest of the line, so markdown next to it would never render.
/// Dropping the element here keeps the surrounding markdown alive;
/// the post-render [`sanitize`] pass stays the hard boundary. Inline
/// code spans are left untouched so documents can still talk about
/// `<script>` tags.
pub(crate) fn strip_dangerous_elements(prose: &str) -> String {
    if !prose.contains('<') {
        return prose.to_string();
    }
    let mut out = String::with_capacity(prose.len());
    let mut rest = prose;
    loop {
        match rest.find('`') {
            None => {
                out.push_str(&strip_outside_code(rest));
                break;
            }
            Some(tick) => {
                out.push_str(&strip_outside_code(&rest[..tick]));
                let from_tick = &rest[tick..];
                let run_len = from_tick.bytes().take_while(|&b| b == b'`').count();
                let run = &from_tick[..run_len];
                match from_tick[run_len..].find(run) {
                    Some(close) => {
                        let span_end = run_len + close + run_len;
                        out.push_str(&from_tick[..span_end]);
                        rest = &from_tick[span_end..];
                    }
                    None => {
                        // Unbalanced backticks — no code span to protect.
                        out.push_str(&strip_outside_code(from_tick));
                        break;
                    }
                }
            }
        }
    }
    out
}

fn strip_outside_code(text: &str) -> String {
    let stripped = DANGEROUS_ELEMENT.replace_all(text, "");
    DANGEROUS_TAG.replace_all(&stripped, "").into_owned()
}

fn skip_past_close(html: &str, from: usize, name: &str) -> usize {
    let needle = format!("</{name}");
    let lower = html[from..].to_ascii_lowercase();
    match lower.find(&needle) {
        Some(i) => {
            let after = from + i + needle.len();
            html[after..]
                .find('>')
                .map(|j| after + j + 1)
                .unwrap_or(html.len())
        }
        None => html.len(),
    }
}
