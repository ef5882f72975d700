//! Text thumbnails for templates.
//!
//! There is no renderer in the store, so the "thumbnail" is a tiny SVG card
//! holding the first words of the rendered email, shipped as a data URI. It is
//! a list-view fallback, not a screenshot.
//!
//! Pipeline: drop `<style>`/`<script>` blocks, drop every remaining tag, decode
//! the handful of entities editors emit, collapse whitespace, keep the first
//! [`THUMBNAIL_TEXT_LEN`] characters.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;

pub const THUMBNAIL_TEXT_LEN: usize = 120;

const DATA_URI_PREFIX: &str = "data:image/svg+xml;base64,";

static BLOCKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(style|script)\b[^>]*>.*?</\s*(style|script)\s*>").expect("valid regex")
});
static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Derives a thumbnail from rendered markup.
///
/// Returns `None` when the markup carries no visible text.
pub fn derive_thumbnail(html: &str) -> Option<String> {
    let text = preview_text(html);
    if text.is_empty() {
        return None;
    }
    Some(format!("{}{}", DATA_URI_PREFIX, STANDARD.encode(render_svg(&text))))
}

/// The visible text of `html`, flattened to one line and capped.
pub fn preview_text(html: &str) -> String {
    let without_blocks = BLOCKS.replace_all(html, " ");
    let without_tags = TAGS.replace_all(&without_blocks, " ");
    let decoded = decode_entities(&without_tags);
    let collapsed = WHITESPACE.replace_all(&decoded, " ");
    collapsed.trim().chars().take(THUMBNAIL_TEXT_LEN).collect()
}

/// Reverses [`derive_thumbnail`]'s encoding. Used by clients that want the
/// SVG body, and by tests.
pub fn decode_thumbnail(thumbnail: &str) -> Option<String> {
    let payload = thumbnail.strip_prefix(DATA_URI_PREFIX)?;
    let bytes = STANDARD.decode(payload).ok()?;
    String::from_utf8(bytes).ok()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn render_svg(text: &str) -> String {
    format!(
        concat!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="240" height="160" viewBox="0 0 240 160">"##,
            r##"<rect width="240" height="160" fill="#f4f4f5"/>"##,
            r##"<text x="12" y="28" font-family="sans-serif" font-size="12" fill="#3f3f46">{}</text>"##,
            "</svg>"
        ),
        escape_xml(text)
    )
}
