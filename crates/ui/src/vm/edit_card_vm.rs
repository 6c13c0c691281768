//! Navigation state of the edit-card screen.
//!
//! Flashcards and quizzes are browsed one at a time through a search-filtered
//! list. The 1-based position lives in the URL so reloads land on the same
//! item; everything here is plain data so the rules can be tested without a
//! renderer.

use deck_core::model::{Flashcard, FlashcardId, Quiz, QuizId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CardView {
    #[default]
    Flashcards,
    Quizzes,
    ReviewQueue,
}

impl CardView {
    pub const ALL: [CardView; 3] = [CardView::Flashcards, CardView::Quizzes, CardView::ReviewQueue];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CardView::Flashcards => "flashcards",
            CardView::Quizzes => "quizzes",
            CardView::ReviewQueue => "review-queue",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CardView::Flashcards => "Flashcards",
            CardView::Quizzes => "Quizzes",
            CardView::ReviewQueue => "Review queue",
        }
    }

    /// Unknown or missing values open the flashcards view.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("quizzes") => CardView::Quizzes,
            Some("review-queue") => CardView::ReviewQueue,
            _ => CardView::Flashcards,
        }
    }
}

/// Direction of the last step, only used to pick a slide animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NavDirection {
    #[default]
    None,
    Left,
    Right,
}

impl NavDirection {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            NavDirection::None => "",
            NavDirection::Left => "slide-left",
            NavDirection::Right => "slide-right",
        }
    }
}

/// What index resolution wants done to the URL position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PositionUpdate {
    Keep,
    Clear,
    Set(usize),
}

/// Turn the raw URL position into an index into a list of `len` items.
///
/// Anything that is not a 1-based position inside the list resolves to the
/// first item and asks for the URL to say `1`. An empty list drops the
/// position altogether.
#[must_use]
pub fn resolve_index(len: usize, raw: Option<&str>) -> (usize, PositionUpdate) {
    if len == 0 {
        let update = if raw.is_some() {
            PositionUpdate::Clear
        } else {
            PositionUpdate::Keep
        };
        return (0, update);
    }
    let Some(position) = raw.and_then(|r| r.trim().parse::<i64>().ok()) else {
        return (0, PositionUpdate::Set(1));
    };
    let index = position
        .checked_sub(1)
        .and_then(|p| usize::try_from(p).ok());
    match index {
        Some(index) if index < len => (index, PositionUpdate::Keep),
        _ => (0, PositionUpdate::Set(1)),
    }
}

/// Index and animation state for the visible list.
///
/// Operations that move the cursor return the 1-based position to write
/// back to the URL.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditCardNav {
    pub index: usize,
    pub direction: NavDirection,
}

impl EditCardNav {
    /// Adopt the URL position after the list or the URL changed.
    pub fn resolve(&mut self, len: usize, raw: Option<&str>) -> PositionUpdate {
        let (index, update) = resolve_index(len, raw);
        self.index = index;
        update
    }

    pub fn next(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        self.index = (self.index + 1) % len;
        self.direction = NavDirection::Right;
        Some(self.index + 1)
    }

    pub fn previous(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        self.index = (self.index + len - 1) % len;
        self.direction = NavDirection::Left;
        Some(self.index + 1)
    }

    /// Go straight to 1-based `position`. Out-of-range targets are ignored.
    pub fn jump(&mut self, len: usize, position: usize) -> Option<usize> {
        if position == 0 || position > len {
            return None;
        }
        let target = position - 1;
        self.direction = match target.cmp(&self.index) {
            std::cmp::Ordering::Greater => NavDirection::Right,
            std::cmp::Ordering::Less => NavDirection::Left,
            std::cmp::Ordering::Equal => NavDirection::None,
        };
        self.index = target;
        Some(position)
    }

    /// Back to the first item without animating; used for new search terms
    /// and explicit resets.
    pub fn reset(&mut self) -> usize {
        self.index = 0;
        self.direction = NavDirection::None;
        1
    }
}

#[must_use]
pub fn filter_flashcards(flashcards: &[Flashcard], term: &str) -> Vec<Flashcard> {
    flashcards
        .iter()
        .filter(|f| f.matches(term))
        .cloned()
        .collect()
}

#[must_use]
pub fn filter_quizzes(quizzes: &[Quiz], term: &str) -> Vec<Quiz> {
    quizzes.iter().filter(|q| q.matches(term)).cloned().collect()
}

/// Items that can be located in their unfiltered list.
pub trait Identified {
    type Id: PartialEq;
    fn item_id(&self) -> &Self::Id;
}

impl Identified for Flashcard {
    type Id = FlashcardId;
    fn item_id(&self) -> &FlashcardId {
        &self.id
    }
}

impl Identified for Quiz {
    type Id = QuizId;
    fn item_id(&self) -> &QuizId {
        &self.id
    }
}

/// 1-based position of `item` in the unfiltered `source`, matched by id.
#[must_use]
pub fn original_position<T: Identified>(source: &[T], item: &T) -> Option<usize> {
    source
        .iter()
        .position(|candidate| candidate.item_id() == item.item_id())
        .map(|index| index + 1)
}
