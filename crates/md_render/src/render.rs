//! Markdown → sanitized HTML.
//!
//! Pipeline: lift enhancement blocks out of the source → parse GFM →
//! rewrite the event stream (heading anchor ids, line-break promotion) →
//! emit HTML → sanitize against the allow-list → splice enhancement
//! blocks back in. Rendering never fails; malformed constructs degrade
//! per-block and the rest of the document still displays.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

use crate::enhance;
use crate::options::RenderOptions;
use crate::sanitize::sanitize;
use crate::slug::slugify;

/// Render document text to sanitized HTML.
pub fn render(text: &str, options: &RenderOptions) -> String {
    let (prepared, stash) = enhance::extract(text, options);

    let md_options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut events: Vec<Event> = Parser::new_ext(&prepared, md_options).collect();

    assign_heading_ids(&mut events);
    if options.hard_breaks {
        for event in events.iter_mut() {
            if matches!(event, Event::SoftBreak) {
                *event = Event::HardBreak;
            }
        }
    }

    let mut raw = String::with_capacity(prepared.len() * 2);
    html::push_html(&mut raw, events.into_iter());

    enhance::splice(sanitize(&raw, options), stash)
}

/// Give every heading the slug id of its inline text — the same id the
/// outline derives, so anchors and outline links always agree.
fn assign_heading_ids(events: &mut [Event]) {
    let mut i = 0;
    while i < events.len() {
        if matches!(events[i], Event::Start(Tag::Heading { .. })) {
            let mut text = String::new();
            let mut j = i + 1;
            while j < events.len() {
                match &events[j] {
                    Event::End(TagEnd::Heading(_)) => break,
                    Event::Text(t) | Event::Code(t) => text.push_str(t),
                    _ => {}
                }
                j += 1;
            }
            if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
                *id = Some(CowStr::from(slugify(text.trim())));
            }
            i = j;
        }
        i += 1;
    }
}
