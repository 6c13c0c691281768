/// Run of words on one side of a diff.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffSpan {
    pub text: String,
    pub changed: bool,
}

/// Old and new text split into kept and changed word runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordDiff {
    pub old: Vec<DiffSpan>,
    pub new: Vec<DiffSpan>,
}

// Beyond this many cells the table costs more than the highlight is worth.
const MAX_TABLE_CELLS: usize = 250_000;

/// Word-level diff by longest common subsequence.
#[must_use]
pub fn word_diff(old: &str, new: &str) -> WordDiff {
    let a: Vec<&str> = old.split_whitespace().collect();
    let b: Vec<&str> = new.split_whitespace().collect();

    if a.len().saturating_mul(b.len()) > MAX_TABLE_CELLS {
        return WordDiff {
            old: spans(a.iter().map(|w| (*w, true))),
            new: spans(b.iter().map(|w| (*w, true))),
        };
    }

    // lcs[i][j] = LCS length of a[i..] and b[j..]
    let mut lcs = vec![vec![0u32; b.len() + 1]; a.len() + 1];
    for i in (0..a.len()).rev() {
        for j in (0..b.len()).rev() {
            lcs[i][j] = if a[i] == b[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut old_words = Vec::with_capacity(a.len());
    let mut new_words = Vec::with_capacity(b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            old_words.push((a[i], false));
            new_words.push((b[j], false));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            old_words.push((a[i], true));
            i += 1;
        } else {
            new_words.push((b[j], true));
            j += 1;
        }
    }
    old_words.extend(a[i..].iter().map(|w| (*w, true)));
    new_words.extend(b[j..].iter().map(|w| (*w, true)));

    WordDiff {
        old: spans(old_words),
        new: spans(new_words),
    }
}

fn spans<'a>(words: impl IntoIterator<Item = (&'a str, bool)>) -> Vec<DiffSpan> {
    let mut out: Vec<DiffSpan> = Vec::new();
    for (word, changed) in words {
        match out.last_mut() {
            Some(last) if last.changed == changed => {
                last.text.push(' ');
                last.text.push_str(word);
            }
            _ => {
                if let Some(last) = out.last_mut() {
                    last.text.push(' ');
                }
                out.push(DiffSpan {
                    text: word.to_string(),
                    changed,
                });
            }
        }
    }
    out
}
