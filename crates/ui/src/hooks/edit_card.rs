use deck_core::model::{Flashcard, Quiz};
use dioxus::prelude::*;

use crate::context::CardScope;
use crate::vm::{
    CardQuery, CardView, EditCardNav, NavDirection, PositionUpdate, filter_flashcards,
    filter_quizzes, original_position,
};

use super::previous::use_previous;

/// Which item of the loaded card is on screen, kept in step with the URL.
///
/// `query` is the URL's current query; `on_query` replaces it. Flashcards
/// and quizzes keep separate cursors under `cardNo` and `quizNo`.
#[derive(Clone, Copy, PartialEq)]
pub struct EditCardManager {
    pub view: Memo<CardView>,
    pub search: Memo<String>,
    pub flashcards: Memo<Vec<Flashcard>>,
    pub quizzes: Memo<Vec<Quiz>>,
    flashcard_nav: Signal<EditCardNav>,
    quiz_nav: Signal<EditCardNav>,
    search_just_changed: bool,
    query: Memo<CardQuery>,
    on_query: Callback<CardQuery>,
    scope: CardScope,
}

pub fn use_edit_card_manager(
    scope: CardScope,
    query: Memo<CardQuery>,
    on_query: Callback<CardQuery>,
) -> EditCardManager {
    let view = use_memo(move || query.read().view());
    let search = use_memo(move || query.read().search_term().to_string());

    let flashcards = use_memo(move || {
        let card = scope.current.read();
        card.as_ref()
            .map(|card| filter_flashcards(&card.flashcards, &search.read()))
            .unwrap_or_default()
    });
    let quizzes = use_memo(move || {
        let card = scope.current.read();
        card.as_ref()
            .map(|card| filter_quizzes(&card.quizzes, &search.read()))
            .unwrap_or_default()
    });

    let mut flashcard_nav = use_signal(EditCardNav::default);
    let mut quiz_nav = use_signal(EditCardNav::default);

    use_effect(move || {
        let active = view();
        if scope.current.read().is_none() {
            // Nothing loaded yet: keep the URL position for when it arrives.
            return;
        }
        let len = match active {
            CardView::Flashcards => flashcards.read().len(),
            CardView::Quizzes => quizzes.read().len(),
            CardView::ReviewQueue => return,
        };
        let raw = query.read().position(active).map(str::to_string);
        let update = match active {
            CardView::Quizzes => quiz_nav.write().resolve(len, raw.as_deref()),
            _ => flashcard_nav.write().resolve(len, raw.as_deref()),
        };
        let position = match update {
            PositionUpdate::Keep => return,
            PositionUpdate::Clear => None,
            PositionUpdate::Set(position) => Some(position),
        };
        log::debug!("normalising {} position {raw:?} -> {position:?}", active.as_str());
        let next = query.peek().clone().with_position(active, position);
        if next != *query.peek() {
            on_query.call(next);
        }
    });

    let current_search = search();
    let search_just_changed = use_previous(current_search.clone())
        .is_some_and(|previous| previous != current_search);

    EditCardManager {
        view,
        search,
        flashcards,
        quizzes,
        flashcard_nav,
        quiz_nav,
        search_just_changed,
        query,
        on_query,
        scope,
    }
}

impl EditCardManager {
    fn nav_signal(&self, view: CardView) -> Option<Signal<EditCardNav>> {
        match view {
            CardView::Flashcards => Some(self.flashcard_nav),
            CardView::Quizzes => Some(self.quiz_nav),
            CardView::ReviewQueue => None,
        }
    }

    fn write_query(&self, next: CardQuery) {
        if next != *self.query.peek() {
            self.on_query.call(next);
        }
    }

    fn write_position(&self, view: CardView, position: Option<usize>) {
        if let Some(position) = position {
            let next = self.query.peek().clone().with_position(view, Some(position));
            self.write_query(next);
        }
    }

    /// Length of the filtered list for the active view.
    #[must_use]
    pub fn len(&self) -> usize {
        match (self.view)() {
            CardView::Flashcards => self.flashcards.read().len(),
            CardView::Quizzes => self.quizzes.read().len(),
            CardView::ReviewQueue => 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.nav_signal((self.view)())
            .map_or(0, |nav| nav.read().index)
    }

    /// Slide direction, suppressed on the render right after a new search.
    #[must_use]
    pub fn direction(&self) -> NavDirection {
        if self.search_just_changed {
            return NavDirection::None;
        }
        self.nav_signal((self.view)())
            .map_or(NavDirection::None, |nav| nav.read().direction)
    }

    pub fn next(&self) {
        let view = (self.view)();
        let len = self.len();
        if let Some(mut nav) = self.nav_signal(view) {
            let position = nav.write().next(len);
            self.write_position(view, position);
        }
    }

    pub fn previous(&self) {
        let view = (self.view)();
        let len = self.len();
        if let Some(mut nav) = self.nav_signal(view) {
            let position = nav.write().previous(len);
            self.write_position(view, position);
        }
    }

    /// Go to 1-based `position` of the filtered list.
    pub fn jump(&self, position: usize) {
        let view = (self.view)();
        let len = self.len();
        if let Some(mut nav) = self.nav_signal(view) {
            let position = nav.write().jump(len, position);
            self.write_position(view, position);
        }
    }

    pub fn reset(&self) {
        let view = (self.view)();
        if let Some(mut nav) = self.nav_signal(view) {
            let position = nav.write().reset();
            let position = (self.len() > 0).then_some(position);
            let next = self.query.peek().clone().with_position(view, position);
            self.write_query(next);
        }
    }

    /// New search term: both cursors go back to the first match.
    pub fn set_search(&self, term: &str) {
        if term.trim() == self.search.peek().as_str() {
            return;
        }
        let mut flashcard_nav = self.flashcard_nav;
        let mut quiz_nav = self.quiz_nav;
        flashcard_nav.write().reset();
        quiz_nav.write().reset();

        let active = *self.view.peek();
        let mut next = self
            .query
            .peek()
            .clone()
            .with_search(term)
            .with_position(CardView::Flashcards, None)
            .with_position(CardView::Quizzes, None);
        if active != CardView::ReviewQueue {
            next = next.with_position(active, Some(1));
        }
        self.write_query(next);
    }

    pub fn set_view(&self, view: CardView) {
        if view == *self.view.peek() {
            return;
        }
        if let Some(mut nav) = self.nav_signal(view) {
            nav.write().direction = NavDirection::None;
        }
        let next = self.query.peek().clone().with_view(view);
        self.write_query(next);
    }

    #[must_use]
    pub fn current_flashcard(&self) -> Option<Flashcard> {
        self.flashcards.read().get(self.flashcard_nav.read().index).cloned()
    }

    #[must_use]
    pub fn current_quiz(&self) -> Option<Quiz> {
        self.quizzes.read().get(self.quiz_nav.read().index).cloned()
    }

    /// Position of the current flashcard among all of the card's flashcards.
    #[must_use]
    pub fn flashcard_original_position(&self) -> Option<usize> {
        let current = self.current_flashcard()?;
        let card = self.scope.current.read();
        original_position(&card.as_ref()?.flashcards, &current)
    }

    #[must_use]
    pub fn quiz_original_position(&self) -> Option<usize> {
        let current = self.current_quiz()?;
        let card = self.scope.current.read();
        original_position(&card.as_ref()?.quizzes, &current)
    }

    /// Unfiltered totals for the "n of total" label.
    #[must_use]
    pub fn totals(&self) -> (usize, usize) {
        self.scope
            .current
            .read()
            .as_ref()
            .map_or((0, 0), |card| (card.flashcards.len(), card.quizzes.len()))
    }
}
