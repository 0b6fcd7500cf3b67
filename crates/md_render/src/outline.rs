//! Document title and heading outline.
//!
//! A line scan over the markdown source: one entry per ATX heading, in
//! document order, ids from the shared slug function. Lines inside
//! fenced code blocks are not headings and are skipped.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::slug::slugify;

/// Title used when the document yields nothing better.
pub const UNTITLED: &str = "Untitled Document";

const TITLE_MAX: usize = 50;

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    /// Heading level, 1–6.
    pub level: u8,
    pub text: String,
    /// Anchor id — same algorithm the renderer uses.
    pub id: String,
}

fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// First `# ` heading, else the first non-empty non-heading line
/// (truncated past 50 characters), else [`UNTITLED`].
pub fn extract_title(text: &str) -> String {
    let mut fallback: Option<String> = None;
    let mut in_fence = false;
    for line in text.lines() {
        if is_fence(line) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some(caps) = HEADING.captures(line) {
            if caps[1].len() == 1 {
                return caps[2].trim().to_string();
            }
            continue;
        }
        let trimmed = line.trim();
        if fallback.is_none() && !trimmed.is_empty() && !trimmed.starts_with('#') {
            fallback = Some(if trimmed.chars().count() > TITLE_MAX {
                let head: String = trimmed.chars().take(TITLE_MAX).collect();
                format!("{head}...")
            } else {
                trimmed.to_string()
            });
        }
    }
    fallback.unwrap_or_else(|| UNTITLED.to_string())
}

/// One entry per heading line, in document order.
///
/// Two identical headings produce two entries with the same id — the
/// renderer emits the same duplicate anchors, so the pair stays in sync.
pub fn generate_outline(text: &str) -> Vec<OutlineEntry> {
    let mut outline = Vec::new();
    let mut in_fence = false;
    for line in text.lines() {
        if is_fence(line) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some(caps) = HEADING.captures(line) {
            let heading = caps[2].trim().to_string();
            outline.push(OutlineEntry {
                level: caps[1].len() as u8,
                id: slugify(&heading),
                text: heading,
            });
        }
    }
    outline
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_from_first_h1() {
        assert_eq!(extract_title("# Hello\nbody"), "Hello");
    }

    #[test]
    fn title_from_h1_after_body_lines() {
        assert_eq!(extract_title("intro text\n\n# Real Title"), "Real Title");
    }

    #[test]
    fn title_falls_back_to_first_line() {
        assert_eq!(extract_title("no heading here"), "no heading here");
    }

    #[test]
    fn title_skips_subheadings_in_fallback() {
        assert_eq!(extract_title("## Section\nfirst prose line"), "first prose line");
    }

    #[test]
    fn long_fallback_is_truncated_with_ellipsis() {
        let line = "x".repeat(60);
        let title = extract_title(&line);
        assert_eq!(title.chars().count(), 53);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn empty_document_is_untitled() {
        assert_eq!(extract_title(""), UNTITLED);
        assert_eq!(extract_title("\n\n  \n"), UNTITLED);
    }

    #[test]
    fn heading_inside_fence_is_not_a_title() {
        assert_eq!(extract_title("```\n# not a title\n```\nprose"), "prose");
    }

    #[test]
    fn outline_orders_headings_with_levels() {
        let doc = "# One\n\ntext\n\n## Two\n\n### Three\n";
        let outline = generate_outline(doc);
        assert_eq!(outline.len(), 3);
        assert_eq!(outline[0], OutlineEntry { level: 1, text: "One".into(), id: "one".into() });
        assert_eq!(outline[1].level, 2);
        assert_eq!(outline[2].level, 3);
    }

    #[test]
    fn outline_skips_fenced_code() {
        let doc = "# Real\n```\n# fake\n```\n## Also real\n";
        let ids: Vec<_> = generate_outline(doc).into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["real", "also-real"]);
    }

    #[test]
    fn duplicate_headings_keep_duplicate_ids() {
        let outline = generate_outline("## Notes\n\n## Notes\n");
        assert_eq!(outline[0].id, outline[1].id);
    }

    #[test]
    fn level_seven_hashes_are_not_headings() {
        assert!(generate_outline("####### too deep\n").is_empty());
    }
}
