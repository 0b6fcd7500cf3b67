//! Deferred-enhancement blocks: math and diagrams.
//!
//! `$…$` / `$$…$$` spans and ```mermaid fences carry grammars the
//! markdown and sanitizer passes would mangle, so they are lifted out of
//! the source first, replaced by opaque placeholders, and spliced back
//! after sanitization as classed markup carrying the escaped source.
//! A block that cannot be built degrades to its raw source in an
//! error-styled block — never a blank region, never a panic.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use crate::options::RenderOptions;

static DISPLAY_MATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\$\$(.+?)\$\$").unwrap());
// Inline math must not begin or end with whitespace, so "$5 and $10"
// stays prose.
static INLINE_MATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$(\S(?:[^\$\n]*\S)?)\$").unwrap());

pub(crate) struct Stash {
    sentinel: String,
    blocks: Vec<String>,
}

impl Stash {
    fn new(text: &str) -> Self {
        // The sentinel must not occur in the document, or splicing would
        // hit author text.
        let mut sentinel = String::from("mdblk");
        while text.contains(&sentinel) {
            sentinel.push('q');
        }
        Self {
            sentinel,
            blocks: Vec::new(),
        }
    }

    fn add(&mut self, markup: String) -> String {
        let placeholder = format!("{}{}end", self.sentinel, self.blocks.len());
        self.blocks.push(markup);
        placeholder
    }

    fn placeholder(&self, idx: usize) -> String {
        format!("{}{}end", self.sentinel, idx)
    }
}

/// Lift math spans and diagram fences out of `text`.
pub(crate) fn extract(text: &str, options: &RenderOptions) -> (String, Stash) {
    let mut stash = Stash::new(text);
    let mut out = String::with_capacity(text.len());
    let mut prose = String::new();

    let mut lines = text.split_inclusive('\n');
    while let Some(line) = lines.next() {
        let trimmed = line.trim_start();
        if let Some(info) = fence_open(trimmed) {
            flush_prose(&prose, options, &mut out, &mut stash);
            prose.clear();

            if options.diagrams && info == "mermaid" {
                let mut body = String::new();
                for inner in lines.by_ref() {
                    if fence_close(inner.trim()) {
                        break;
                    }
                    body.push_str(inner);
                }
                let placeholder = stash.add(render_diagram(&body));
                out.push('\n');
                out.push_str(&placeholder);
                out.push_str("\n\n");
            } else {
                // Ordinary fence: copy verbatim, protected from the math
                // scan.
                out.push_str(line);
                for inner in lines.by_ref() {
                    out.push_str(inner);
                    if fence_close(inner.trim()) {
                        break;
                    }
                }
            }
        } else {
            prose.push_str(line);
        }
    }
    flush_prose(&prose, options, &mut out, &mut stash);
    (out, stash)
}

/// Prose leaving the buffer gets dangerous raw-HTML elements stripped
/// (so adjacent markdown still parses) and math spans lifted out.
fn flush_prose(prose: &str, options: &RenderOptions, out: &mut String, stash: &mut Stash) {
    let safe = crate::sanitize::strip_dangerous_elements(prose);
    out.push_str(&extract_math(&safe, options, stash));
}

/// Splice rendered blocks back over their placeholders.
pub(crate) fn splice(mut html: String, stash: Stash) -> String {
    for (idx, block) in stash.blocks.iter().enumerate() {
        let placeholder = stash.placeholder(idx);
        match html.find(&placeholder) {
            Some(at) => html.replace_range(at..at + placeholder.len(), block),
            // The placeholder can vanish when its surrounding markup was
            // stripped; dropping the block is the correct no-op then.
            None => debug!(idx, "enhancement placeholder vanished during rendering"),
        }
    }
    html
}

fn fence_open(trimmed_line: &str) -> Option<&str> {
    for marker in ["```", "~~~"] {
        if let Some(rest) = trimmed_line.strip_prefix(marker) {
            return Some(rest.trim_matches(|c| c == '`' || c == '~').trim());
        }
    }
    None
}

fn fence_close(trimmed_line: &str) -> bool {
    !trimmed_line.is_empty()
        && (trimmed_line.chars().all(|c| c == '`') || trimmed_line.chars().all(|c| c == '~'))
        && trimmed_line.len() >= 3
}

fn extract_math(prose: &str, options: &RenderOptions, stash: &mut Stash) -> String {
    if !options.math || !prose.contains('$') {
        return prose.to_string();
    }
    let with_display = DISPLAY_MATH.replace_all(prose, |caps: &Captures| {
        stash.add(render_math(&caps[1], true))
    });
    INLINE_MATH
        .replace_all(&with_display, |caps: &Captures| {
            stash.add(render_math(&caps[1], false))
        })
        .into_owned()
}

fn render_math(source: &str, display: bool) -> String {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        let raw = if display {
            format!("$${source}$$")
        } else {
            format!("${source}$")
        };
        debug!("empty math span — showing raw source");
        return format!(r#"<pre class="math-error">{}</pre>"#, escape_html(&raw));
    }
    if display {
        format!(r#"<div class="math math-display">{}</div>"#, escape_html(trimmed))
    } else {
        format!(r#"<span class="math math-inline">{}</span>"#, escape_html(trimmed))
    }
}

fn render_diagram(source: &str) -> String {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        debug!("empty diagram block — showing raw source");
        return format!(r#"<pre class="diagram-error">{}</pre>"#, escape_html(source));
    }
    format!(r#"<div class="diagram diagram-mermaid">{}</div>"#, escape_html(trimmed))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> RenderOptions {
        RenderOptions::default()
    }

    #[test]
    fn inline_math_is_lifted_and_spliced() {
        let (prepared, stash) = extract("Euler: $e^{i\\pi}+1=0$ done", &defaults());
        assert!(!prepared.contains('$'));
        assert!(prepared.contains("mdblk0end"));
        let spliced = splice(prepared, stash);
        assert!(spliced.contains(r#"<span class="math math-inline">"#));
        assert!(spliced.contains("e^{i\\pi}+1=0"));
    }

    #[test]
    fn display_math_wins_over_inline() {
        let (prepared, stash) = extract("$$\\sum_{k=1}^n k$$", &defaults());
        let spliced = splice(prepared, stash);
        assert!(spliced.contains(r#"<div class="math math-display">"#));
    }

    #[test]
    fn currency_is_not_math() {
        let (prepared, _) = extract("$5 and $10 please", &defaults());
        assert_eq!(prepared, "$5 and $10 please");
    }

    #[test]
    fn math_markup_is_escaped() {
        let (prepared, stash) = extract("$a<b>c$", &defaults());
        let spliced = splice(prepared, stash);
        assert!(spliced.contains("a&lt;b&gt;c"));
        assert!(!spliced.contains("<b>"));
    }

    #[test]
    fn mermaid_fence_becomes_diagram() {
        let doc = "before\n\n```mermaid\ngraph TD;\n  A-->B;\n```\n\nafter\n";
        let (prepared, stash) = extract(doc, &defaults());
        assert!(!prepared.contains("graph TD"));
        let spliced = splice(prepared, stash);
        assert!(spliced.contains(r#"<div class="diagram diagram-mermaid">"#));
        assert!(spliced.contains("A--&gt;B;"));
    }

    #[test]
    fn ordinary_fences_protect_dollar_signs() {
        let doc = "```bash\necho $HOME$PATH\n```\n";
        let (prepared, stash) = extract(doc, &defaults());
        assert_eq!(prepared, doc);
        assert!(stash.blocks.is_empty());
    }

    #[test]
    fn empty_diagram_degrades_to_error_block() {
        let doc = "```mermaid\n```\n";
        let (prepared, stash) = extract(doc, &defaults());
        let spliced = splice(prepared, stash);
        assert!(spliced.contains(r#"<pre class="diagram-error">"#));
    }

    #[test]
    fn disabled_features_leave_text_alone() {
        let options = RenderOptions {
            math: false,
            diagrams: false,
            ..RenderOptions::default()
        };
        let doc = "$x$\n\n```mermaid\ngraph\n```\n";
        let (prepared, stash) = extract(doc, &options);
        assert_eq!(prepared, doc);
        assert!(stash.blocks.is_empty());
    }

    #[test]
    fn sentinel_avoids_author_text() {
        let (prepared, stash) = extract("mdblk0end and $x$", &defaults());
        assert!(stash.sentinel.len() > "mdblk".len());
        assert!(prepared.starts_with("mdblk0end"));
    }
}
