use crate::model::ids::FlashcardId;
use crate::text::rich_text_matches;

/// Question/answer pair. Both sides are rich text (HTML).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    pub id: FlashcardId,
    pub question: String,
    pub answer: String,
}

impl Flashcard {
    #[must_use]
    pub fn new(id: FlashcardId, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id,
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Case-insensitive match against question or answer text.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        rich_text_matches(&self.question, term) || rich_text_matches(&self.answer, term)
    }
}
