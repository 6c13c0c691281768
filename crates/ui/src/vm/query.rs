use std::fmt;

use url::form_urlencoded;

use super::edit_card_vm::CardView;

const VIEW_KEY: &str = "view";
const SEARCH_KEY: &str = "search";

/// Query string of the card route: `view`, `search`, `cardNo`, `quizNo`.
///
/// Values are kept raw so that malformed positions reach index resolution
/// untouched and get normalised there. Unknown keys survive a round trip.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardQuery {
    pub view: Option<String>,
    pub search: Option<String>,
    pub card_no: Option<String>,
    pub quiz_no: Option<String>,
    extra: Vec<(String, String)>,
}

impl CardQuery {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let mut query = Self::default();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                VIEW_KEY => query.view = Some(value),
                SEARCH_KEY => query.search = Some(value),
                "cardNo" => query.card_no = Some(value),
                "quizNo" => query.quiz_no = Some(value),
                other => query.extra.push((other.to_string(), value)),
            }
        }
        query
    }

    #[must_use]
    pub fn view(&self) -> CardView {
        CardView::parse(self.view.as_deref())
    }

    /// Search term with surrounding whitespace removed; empty when unset.
    #[must_use]
    pub fn search_term(&self) -> &str {
        self.search.as_deref().map_or("", str::trim)
    }

    /// Raw 1-based position stored for `view`. The review queue keeps none.
    #[must_use]
    pub fn position(&self, view: CardView) -> Option<&str> {
        match view {
            CardView::Flashcards => self.card_no.as_deref(),
            CardView::Quizzes => self.quiz_no.as_deref(),
            CardView::ReviewQueue => None,
        }
    }

    #[must_use]
    pub fn with_position(mut self, view: CardView, position: Option<usize>) -> Self {
        let value = position.map(|p| p.to_string());
        match view {
            CardView::Flashcards => self.card_no = value,
            CardView::Quizzes => self.quiz_no = value,
            CardView::ReviewQueue => {}
        }
        self
    }

    #[must_use]
    pub fn with_search(mut self, term: &str) -> Self {
        let term = term.trim();
        self.search = (!term.is_empty()).then(|| term.to_string());
        self
    }

    #[must_use]
    pub fn with_view(mut self, view: CardView) -> Self {
        self.view = match view {
            CardView::Flashcards => None,
            other => Some(other.as_str().to_string()),
        };
        self
    }
}

impl From<&str> for CardQuery {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl fmt::Display for CardQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = form_urlencoded::Serializer::new(String::new());
        let known = [
            (VIEW_KEY, &self.view),
            (SEARCH_KEY, &self.search),
            ("cardNo", &self.card_no),
            ("quizNo", &self.quiz_no),
        ];
        for (key, value) in known {
            if let Some(value) = value {
                out.append_pair(key, value);
            }
        }
        for (key, value) in &self.extra {
            out.append_pair(key, value);
        }
        f.write_str(&out.finish())
    }
}
