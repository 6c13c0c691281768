use std::collections::{HashMap, HashSet};

use deck_core::text::{is_blank, plain_text};

/// Clean editor HTML before it is injected with `dangerous_inner_html`.
#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let tags: HashSet<&str> = [
        "p", "div", "span", "br", "em", "strong", "b", "i", "u", "s", "sub", "sup", "code",
        "pre", "blockquote", "ul", "ol", "li", "a", "h1", "h2", "h3",
    ]
    .into_iter()
    .collect();

    let mut attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
    attributes.insert("a", ["href"].into_iter().collect());

    ammonia::Builder::new()
        .tags(tags)
        .tag_attributes(attributes)
        .clean(html)
        .to_string()
}

/// Markup-free one-liner, cut to `max_chars` with an ellipsis.
#[must_use]
pub fn preview(html: &str, max_chars: usize) -> String {
    let text = plain_text(html);
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut cut: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    cut
}

/// Placeholder text for bodies that render as nothing.
#[must_use]
pub fn display_or(html: &str, placeholder: &str) -> String {
    if is_blank(html) {
        placeholder.to_string()
    } else {
        sanitize_html(html)
    }
}
