//! Heading slugs.
//!
//! One shared pure function: the renderer's `id` attributes and the
//! outline's entries must come from the same algorithm, or outline links
//! stop matching the anchors they point at.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());
static WS_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Lowercase, strip punctuation, collapse whitespace runs to hyphens.
///
/// Identical heading text yields identical ids; duplicates are not
/// de-duplicated.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = NON_SLUG.replace_all(&lowered, "");
    WS_RUN.replace_all(&stripped, "-").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic() {
        assert_eq!(slugify("Getting Started"), "getting-started");
    }

    #[test]
    fn punctuation_is_stripped() {
        assert_eq!(slugify("What's new? (v2.0)"), "whats-new-v20");
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(slugify("a   b\t c"), "a-b-c");
    }

    #[test]
    fn code_and_emphasis_markers_vanish() {
        assert_eq!(slugify("Use `encode()` *now*"), "use-encode-now");
    }

    #[test]
    fn identical_text_gives_identical_ids() {
        assert_eq!(slugify("Notes"), slugify("Notes"));
    }
}
