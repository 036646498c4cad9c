//! HTML helpers for computed content fields.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Marker splitting the teaser from the rest of a post.
pub const PAGEBREAK: &str = "<!-- pagebreak -->";

static IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\b[^>]*?\ssrc\s*=\s*["']([^"']+)["']"#).expect("img pattern is valid")
});

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|([a-zA-Z][a-zA-Z0-9]*));")
        .expect("entity pattern is valid")
});

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

/// `src` of the first `<img>` element.
pub fn first_image(html: &str) -> Option<String> {
    IMG_SRC
        .captures(html)
        .map(|caps| caps[1].trim().to_owned())
        .filter(|src| !src.is_empty())
}

/// Content before the pagebreak marker, if the marker is present.
pub fn before_pagebreak(content: &str) -> Option<&str> {
    content
        .split_once(PAGEBREAK)
        .map(|(teaser, _)| teaser)
}

/// Plain text of an HTML fragment with whitespace collapsed.
pub fn strip_tags(html: &str) -> String {
    let text = TAG.replace_all(html, " ");
    let text = decode_entities(&text);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Decode character references in one pass, so `&amp;lt;` stays `&lt;`.
///
/// Numeric references and the common named ones are decoded; other names
/// and invalid code points are kept as written.
fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures<'_>| {
            let decoded = match (caps.get(1), caps.get(2), caps.get(3)) {
                (Some(dec), _, _) => dec.as_str().parse().ok().and_then(char::from_u32),
                (_, Some(hex), _) => u32::from_str_radix(hex.as_str(), 16)
                    .ok()
                    .and_then(char::from_u32),
                (_, _, Some(name)) => named_entity(name.as_str()),
                _ => None,
            };
            decoded.map_or_else(|| caps[0].to_owned(), String::from)
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201C}',
        "rdquo" => '\u{201D}',
        "hellip" => '\u{2026}',
        "copy" => '\u{A9}',
        "reg" => '\u{AE}',
        "trade" => '\u{2122}',
        "euro" => '\u{20AC}',
        _ => return None,
    };
    Some(c)
}
