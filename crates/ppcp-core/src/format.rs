//! # Text Formatting
//!
//! Cleans catalog text before it is placed in a gateway payload.
//!
//! Product names come from the catalog verbatim: they may hold markup,
//! HTML entities, emoji or trademark symbols, and can be arbitrarily long.
//! PayPal rejects the whole order on a bad item name, so every string field
//! goes through here.
//!
//! ## Pipeline
//! ```text
//! "<b>Mug&nbsp;™ &amp; Saucer</b>"
//!      │  strip_markup
//!      ▼
//! "Mug&nbsp;™ &amp; Saucer"
//!      │  decode_entities
//!      ▼
//! "Mug ™ & Saucer"
//!      │  drop disallowed characters, collapse whitespace
//!      ▼
//! "Mug & Saucer"
//!      │  truncate (127 chars, never inside a code point)
//!      ▼
//! "Mug & Saucer"          (empty → "not available")
//! ```

use crate::{MAX_NAME_LENGTH, NOT_AVAILABLE};

/// Punctuation kept in names and descriptions, besides letters, digits and
/// whitespace.
const ALLOWED_PUNCTUATION: &[char] = &['-', '_', '.', ',', '\'', '&', '(', ')', '/', ':', '#', '+', '!'];

/// Decoded in order; `&amp;` is last so `&amp;lt;` yields `&lt;`, not `<`.
const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
];

// =============================================================================
// Public Formatters
// =============================================================================

/// Formats a product name for the `name` field.
///
/// ## Example
/// ```rust
/// use ppcp_core::format::format_name;
///
/// assert_eq!(format_name("<b>Blue</b> Mug"), "Blue Mug");
/// assert_eq!(format_name("™®©"), "not available");
/// ```
pub fn format_name(raw: &str) -> String {
    let cleaned = clean_text(raw, MAX_NAME_LENGTH);
    if cleaned.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        cleaned
    }
}

/// Formats an optional description; `None` when nothing survives cleaning.
pub fn format_description(raw: Option<&str>) -> Option<String> {
    raw.map(|text| clean_text(text, MAX_NAME_LENGTH))
        .filter(|text| !text.is_empty())
}

/// Truncates to at most `max_chars` characters.
///
/// Counts `char`s, not bytes, so a multi-byte character is either kept
/// whole or dropped.
pub fn truncate(raw: &str, max_chars: usize) -> String {
    raw.chars().take(max_chars).collect()
}

// =============================================================================
// Helpers
// =============================================================================

fn clean_text(raw: &str, max_chars: usize) -> String {
    let decoded = decode_entities(&strip_markup(raw));

    let filtered: String = decoded
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || ALLOWED_PUNCTUATION.contains(c))
        .collect();

    let collapsed = filtered.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&collapsed, max_chars)
}

/// Removes `<tag ...>` sequences. A `<` that does not open a tag, or whose
/// tag is never closed, is kept (and later filtered as punctuation).
fn strip_markup(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        let opens_tag = after
            .chars()
            .next()
            .is_some_and(|next| next.is_ascii_alphabetic() || matches!(next, '/' | '!'));

        match after.find('>').filter(|_| opens_tag) {
            Some(end) => {
                out.push_str(&rest[..start]);
                out.push(' ');
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[..=start]);
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, replacement)| {
            acc.replace(entity, replacement)
        })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name_untouched() {
        assert_eq!(format_name("Coffee Mug 330ml"), "Coffee Mug 330ml");
        assert_eq!(format_name("Kid's T-Shirt (Blue)"), "Kid's T-Shirt (Blue)");
    }

    #[test]
    fn test_markup_stripped() {
        assert_eq!(format_name("<p>Blue <em>Mug</em></p>"), "Blue Mug");
        assert_eq!(format_name("<script>alert(1)</script>Mug"), "alert(1) Mug");
        assert_eq!(format_name("a < b"), "a b");
    }

    #[test]
    fn test_unclosed_tag_keeps_text() {
        assert_eq!(format_name("Tom<Jerry"), "TomJerry");
        assert_eq!(format_name("Cup <b Blue"), "Cup b Blue");
        assert_eq!(format_name("<b>Mug</b> <i"), "Mug i");
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(format_name("Mug &amp; Saucer"), "Mug & Saucer");
        assert_eq!(format_name("Mug&nbsp;Set"), "Mug Set");
    }

    #[test]
    fn test_entities_decoded_once() {
        assert_eq!(decode_entities("&amp;lt;b&amp;gt;"), "&lt;b&gt;");
        assert_eq!(decode_entities("Fish &amp;amp; Chips"), "Fish &amp; Chips");
        assert_eq!(decode_entities("&lt;&amp;&gt;"), "<&>");
    }

    #[test]
    fn test_only_disallowed_symbols_falls_back() {
        assert_eq!(format_name("™®©$%^*"), NOT_AVAILABLE);
        assert_eq!(format_name("   "), NOT_AVAILABLE);
        assert_eq!(format_name(""), NOT_AVAILABLE);
        assert_eq!(format_name("<br/>"), NOT_AVAILABLE);
    }

    #[test]
    fn test_multibyte_truncation() {
        let long = "é".repeat(200);
        let formatted = format_name(&long);
        assert_eq!(formatted.chars().count(), MAX_NAME_LENGTH);
        assert_eq!(formatted, "é".repeat(MAX_NAME_LENGTH));

        let cjk = "茶".repeat(130);
        assert_eq!(format_name(&cjk).chars().count(), MAX_NAME_LENGTH);
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("ÅÄÖabc", 4), "ÅÄÖa");
        assert_eq!(truncate("short", 12), "short");
    }

    #[test]
    fn test_format_description() {
        assert_eq!(format_description(None), None);
        assert_eq!(format_description(Some("<p></p>")), None);
        assert_eq!(
            format_description(Some("<p>Hand made</p>")),
            Some("Hand made".to_string())
        );
    }
}
