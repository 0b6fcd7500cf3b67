//! md_render — markdown to sanitized HTML for shared documents
//!
//! Converts decoded document text into a GitHub-flavoured HTML view,
//! plus the document title and heading outline the viewer chrome needs.
//! Everything is a pure function over the input text and an immutable
//! [`RenderOptions`] value — no global grammar or sanitizer state, so
//! concurrent renders never interfere.
//!
//! # Module layout
//! - `render`   — markdown → sanitized HTML pipeline
//! - `sanitize` — allow-list HTML filter (the XSS boundary)
//! - `outline`  — document title + heading outline
//! - `slug`     — the one shared heading-id function
//! - `options`  — immutable renderer configuration
//! - `enhance`  — math / diagram placeholder pass (internal)

mod enhance;
pub mod options;
pub mod outline;
pub mod render;
pub mod sanitize;
pub mod slug;

pub use options::RenderOptions;
pub use outline::{extract_title, generate_outline, OutlineEntry, UNTITLED};
pub use render::render;
pub use sanitize::sanitize;
pub use slug::slugify;

/// Everything the viewer derives from one document, regenerated on every
/// decode.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub html: String,
    pub title: String,
    pub outline: Vec<OutlineEntry>,
}

/// Render text plus its title and outline in one call.
pub fn render_document(text: &str, options: &RenderOptions) -> RenderedDocument {
    RenderedDocument {
        html: render::render(text, options),
        title: outline::extract_title(text),
        outline: outline::generate_outline(text),
    }
}
