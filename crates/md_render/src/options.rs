//! Renderer configuration.
//!
//! One immutable value passed into every render call — no process-wide
//! grammar or sanitizer state, so renders from different contexts never
//! interfere with each other.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Promote single newlines to hard line breaks (GFM `breaks`).
    pub hard_breaks: bool,
    /// Replace ```mermaid fences with diagram blocks.
    pub diagrams: bool,
    /// Carry `$…$` / `$$…$$` spans through the pipeline as math blocks.
    pub math: bool,
    /// Tags outside this list are stripped wholesale, never
    /// escaped-and-shown. Must never contain a script-execution vector.
    pub allowed_tags: BTreeSet<String>,
    /// Attributes outside this list are dropped from every tag.
    pub allowed_attrs: BTreeSet<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        let allowed_tags = [
            "h1", "h2", "h3", "h4", "h5", "h6", //
            "p", "br", "hr", //
            "strong", "em", "code", "pre", //
            "ul", "ol", "li", //
            "blockquote", //
            "table", "thead", "tbody", "tr", "th", "td", //
            "a", "img", //
            "del", "ins", //
            "div", "span", //
            // Task-list checkboxes; attribute filtering keeps these inert.
            "input",
        ];
        let allowed_attrs = [
            "href", "title", "alt", "src", //
            "class", "id", //
            "target", "rel", //
            "type", "checked", "disabled",
        ];
        Self {
            hard_breaks: true,
            diagrams: true,
            math: true,
            allowed_tags: allowed_tags.iter().map(|t| t.to_string()).collect(),
            allowed_attrs: allowed_attrs.iter().map(|a| a.to_string()).collect(),
        }
    }
}
