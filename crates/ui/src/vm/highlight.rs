/// Piece of a label, flagged when it matches the active search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighlightSpan {
    pub text: String,
    pub is_match: bool,
}

impl HighlightSpan {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_match: false,
        }
    }
}

/// Split `text` around case-insensitive occurrences of `query`.
///
/// Offsets are tracked per lowered char so that case folds which change
/// byte length still slice `text` on char boundaries.
#[must_use]
pub fn highlight_spans(text: &str, query: &str) -> Vec<HighlightSpan> {
    let needle: Vec<char> = query.trim().to_lowercase().chars().collect();
    if needle.is_empty() || text.is_empty() {
        return vec![HighlightSpan::plain(text)];
    }

    // (lowered char, byte start, byte end) in the original text.
    let folded: Vec<(char, usize, usize)> = text
        .char_indices()
        .flat_map(|(start, ch)| {
            let end = start + ch.len_utf8();
            ch.to_lowercase().map(move |lower| (lower, start, end))
        })
        .collect();

    let mut spans = Vec::new();
    let mut cursor = 0usize;
    let mut idx = 0usize;
    while idx + needle.len() <= folded.len() {
        let window = &folded[idx..idx + needle.len()];
        if !window.iter().map(|(c, _, _)| *c).eq(needle.iter().copied()) {
            idx += 1;
            continue;
        }
        let start = window[0].1;
        let end = window[needle.len() - 1].2;
        if start > cursor {
            spans.push(HighlightSpan::plain(&text[cursor..start]));
        }
        if start < end && start >= cursor {
            spans.push(HighlightSpan {
                text: text[start..end].to_string(),
                is_match: true,
            });
            cursor = end;
        }
        idx += needle.len();
    }
    if cursor < text.len() {
        spans.push(HighlightSpan::plain(&text[cursor..]));
    }
    if spans.is_empty() {
        spans.push(HighlightSpan::plain(text));
    }
    spans
}
