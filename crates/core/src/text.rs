//! Helpers for the rich-text (HTML) bodies stored on flashcards, quizzes and
//! review-queue values.

use std::collections::{HashMap, HashSet};

use html_escape::decode_html_entities;

/// Tags kept through the first pass so their boundaries can become line
/// breaks. Everything else is dropped by the sanitiser.
const BLOCK_TAGS: [&str; 13] = [
    "br", "p", "div", "li", "ul", "ol", "blockquote", "pre", "h1", "h2", "h3", "h4", "tr",
];

/// Visible text of an HTML body.
///
/// `ammonia` parses the markup and keeps only block tags, which serialise
/// without attributes; those become newlines and the remaining entities are
/// decoded. Non-breaking spaces are folded into plain spaces.
#[must_use]
pub fn plain_text(input: &str) -> String {
    let blocks_only = ammonia::Builder::empty()
        .add_tags(BLOCK_TAGS)
        .generic_attributes(HashSet::new())
        .tag_attributes(HashMap::new())
        .add_clean_content_tags(["script", "style"])
        .clean(input)
        .to_string();

    let mut flat = blocks_only;
    for tag in BLOCK_TAGS {
        flat = flat
            .replace(&format!("<{tag}>"), "\n")
            .replace(&format!("</{tag}>"), "\n");
    }

    decode_html_entities(&flat).replace('\u{a0}', " ")
}

/// Case-insensitive substring test. A blank needle matches everything.
#[must_use]
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Case-insensitive match of `term` against the visible text of an HTML body.
#[must_use]
pub fn rich_text_matches(html: &str, term: &str) -> bool {
    if term.trim().is_empty() {
        return true;
    }
    contains_ci(&plain_text(html), term)
}

/// True when the HTML body has no visible characters.
#[must_use]
pub fn is_blank(html: &str) -> bool {
    plain_text(html).trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_removes_markup_and_breaks_blocks() {
        let text = plain_text("<p>Hello<br/>World</p>");
        assert_eq!(text.trim(), "Hello\nWorld");
    }

    #[test]
    fn plain_text_decodes_entities() {
        assert_eq!(plain_text("a &amp; b&nbsp;&lt;c&gt;"), "a & b <c>");
    }

    #[test]
    fn rich_text_match_ignores_tags_and_case() {
        assert!(rich_text_matches("<strong>Mito</strong>chondria", "mitochondria"));
        assert!(!rich_text_matches("<span class=\"strong\">x</span>", "strong"));
        assert!(rich_text_matches("anything", "   "));
    }

    #[test]
    fn plain_text_decodes_named_and_numeric_entities() {
        assert_eq!(plain_text("<p>caf&eacute;</p>").trim(), "café");
        assert_eq!(plain_text("<p>it&#8217;s</p>").trim(), "it\u{2019}s");
        assert!(rich_text_matches("<p>Caf&eacute; au lait</p>", "CAFÉ"));
    }

    #[test]
    fn bare_angle_bracket_is_text() {
        assert_eq!(plain_text("<p>x < y and z</p>").trim(), "x < y and z");
        assert!(rich_text_matches("<p>x < y and z</p>", "and z"));
    }

    #[test]
    fn script_bodies_are_not_searchable() {
        assert!(!rich_text_matches("<p>ok</p><script>secret()</script>", "secret"));
    }

    #[test]
    fn is_blank_sees_through_empty_markup() {
        assert!(is_blank("<p><br></p>"));
        assert!(is_blank("&nbsp;"));
        assert!(!is_blank("<p>x</p>"));
    }
}
