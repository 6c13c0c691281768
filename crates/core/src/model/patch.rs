use thiserror::Error;

use crate::model::card::{Card, TopicField};
use crate::model::flashcard::Flashcard;
use crate::model::ids::{FlashcardId, QuizId};
use crate::model::quiz::{Quiz, QuizError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PatchError {
    #[error("flashcard {0} not found")]
    FlashcardNotFound(FlashcardId),

    #[error("quiz {0} not found")]
    QuizNotFound(QuizId),

    #[error("addition was not echoed back by the server")]
    MissingCreated,

    #[error(transparent)]
    Quiz(#[from] QuizError),
}

/// A single field-level edit of a card.
///
/// Each variant targets one field or one array element, so patches issued by
/// different editors never overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardPatch {
    Topic {
        field: TopicField,
        value: String,
    },
    AddFlashcard {
        question: String,
        answer: String,
    },
    EditFlashcard {
        flashcard_id: FlashcardId,
        question: Option<String>,
        answer: Option<String>,
    },
    DeleteFlashcard {
        flashcard_id: FlashcardId,
    },
    AddQuiz {
        question: String,
        answer: String,
        minimum_options: u8,
    },
    EditQuiz {
        quiz_id: QuizId,
        question: Option<String>,
        answer: Option<String>,
    },
    AddQuizOption {
        quiz_id: QuizId,
        option: String,
    },
    EditQuizOption {
        quiz_id: QuizId,
        option_index: usize,
        option: String,
    },
    DeleteQuiz {
        quiz_id: QuizId,
    },
}

/// Sub-resource the server created while applying an addition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Created {
    Flashcard(Flashcard),
    Quiz(Quiz),
}

impl CardPatch {
    /// Name of the field this patch touches, as recorded in logs and queue items.
    #[must_use]
    pub fn field_name(&self) -> &'static str {
        match self {
            CardPatch::Topic { field, .. } => field.wire_name(),
            CardPatch::AddFlashcard { .. }
            | CardPatch::EditFlashcard { .. }
            | CardPatch::DeleteFlashcard { .. } => "flashcards",
            CardPatch::AddQuiz { .. }
            | CardPatch::EditQuiz { .. }
            | CardPatch::DeleteQuiz { .. } => "quizzes",
            CardPatch::AddQuizOption { .. } | CardPatch::EditQuizOption { .. } => "options",
        }
    }

    /// Mirror a server-accepted patch into the locally held card.
    ///
    /// Additions need the server-created item since ids are assigned remotely.
    ///
    /// # Errors
    ///
    /// Returns `PatchError` when the target is missing, an addition arrives
    /// without its created item, or a quiz option rule is violated.
    pub fn apply_to(&self, card: &mut Card, created: Option<Created>) -> Result<(), PatchError> {
        match self {
            CardPatch::Topic { field, value } => {
                card.topic.set(*field, value.clone());
            }
            CardPatch::AddFlashcard { .. } => match created {
                Some(Created::Flashcard(flashcard)) => card.flashcards.push(flashcard),
                _ => return Err(PatchError::MissingCreated),
            },
            CardPatch::EditFlashcard {
                flashcard_id,
                question,
                answer,
            } => {
                let index = card
                    .flashcard_index(flashcard_id)
                    .ok_or_else(|| PatchError::FlashcardNotFound(flashcard_id.clone()))?;
                let target = &mut card.flashcards[index];
                if let Some(question) = question {
                    target.question.clone_from(question);
                }
                if let Some(answer) = answer {
                    target.answer.clone_from(answer);
                }
            }
            CardPatch::DeleteFlashcard { flashcard_id } => {
                let index = card
                    .flashcard_index(flashcard_id)
                    .ok_or_else(|| PatchError::FlashcardNotFound(flashcard_id.clone()))?;
                card.flashcards.remove(index);
            }
            CardPatch::AddQuiz { .. } => match created {
                Some(Created::Quiz(quiz)) => card.quizzes.push(quiz),
                _ => return Err(PatchError::MissingCreated),
            },
            CardPatch::EditQuiz {
                quiz_id,
                question,
                answer,
            } => {
                let quiz = quiz_mut(card, quiz_id)?;
                if let Some(question) = question {
                    quiz.question.clone_from(question);
                }
                if let Some(answer) = answer {
                    quiz.answer.clone_from(answer);
                }
            }
            CardPatch::AddQuizOption { quiz_id, option } => {
                quiz_mut(card, quiz_id)?.push_option(option)?;
            }
            CardPatch::EditQuizOption {
                quiz_id,
                option_index,
                option,
            } => {
                quiz_mut(card, quiz_id)?.set_option(*option_index, option)?;
            }
            CardPatch::DeleteQuiz { quiz_id } => {
                let index = card
                    .quiz_index(quiz_id)
                    .ok_or_else(|| PatchError::QuizNotFound(quiz_id.clone()))?;
                card.quizzes.remove(index);
            }
        }
        Ok(())
    }
}

fn quiz_mut<'a>(card: &'a mut Card, quiz_id: &QuizId) -> Result<&'a mut Quiz, PatchError> {
    card.quizzes
        .iter_mut()
        .find(|q| &q.id == quiz_id)
        .ok_or_else(|| PatchError::QuizNotFound(quiz_id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::card::TopicMeta;
    use crate::model::ids::CardId;
    use crate::time::fixed_now;

    fn card() -> Card {
        let mut card = Card::new(CardId::new("c1"), TopicMeta::default(), None, fixed_now());
        card.flashcards = vec![
            Flashcard::new(FlashcardId::new("f1"), "Q1", "A1"),
            Flashcard::new(FlashcardId::new("f2"), "Q2", "A2"),
        ];
        card.quizzes = vec![
            Quiz::new(QuizId::new("z1"), "Q", "A", 3, vec!["x".to_string()]).unwrap(),
        ];
        card
    }

    #[test]
    fn topic_patch_sets_field() {
        let mut c = card();
        CardPatch::Topic {
            field: TopicField::SubTopic,
            value: "Cells".into(),
        }
        .apply_to(&mut c, None)
        .unwrap();
        assert_eq!(c.topic.sub_topic, "Cells");
    }

    #[test]
    fn edit_and_delete_flashcard_by_id() {
        let mut c = card();
        CardPatch::EditFlashcard {
            flashcard_id: FlashcardId::new("f2"),
            question: None,
            answer: Some("A2'".into()),
        }
        .apply_to(&mut c, None)
        .unwrap();
        assert_eq!(c.flashcards[1].answer, "A2'");
        assert_eq!(c.flashcards[1].question, "Q2");

        CardPatch::DeleteFlashcard {
            flashcard_id: FlashcardId::new("f1"),
        }
        .apply_to(&mut c, None)
        .unwrap();
        assert_eq!(c.flashcards.len(), 1);
        assert_eq!(c.flashcards[0].id, FlashcardId::new("f2"));
    }

    #[test]
    fn addition_requires_created_item() {
        let mut c = card();
        let patch = CardPatch::AddFlashcard {
            question: "Q3".into(),
            answer: "A3".into(),
        };
        assert_eq!(patch.apply_to(&mut c, None), Err(PatchError::MissingCreated));

        let created = Flashcard::new(FlashcardId::new("f3"), "Q3", "A3");
        patch
            .apply_to(&mut c, Some(Created::Flashcard(created)))
            .unwrap();
        assert_eq!(c.flashcards.len(), 3);
    }

    #[test]
    fn option_overflow_is_refused() {
        let mut c = card();
        let add = |option: &str| CardPatch::AddQuizOption {
            quiz_id: QuizId::new("z1"),
            option: option.into(),
        };
        add("y").apply_to(&mut c, None).unwrap();
        let err = add("z").apply_to(&mut c, None).unwrap_err();
        assert_eq!(err, PatchError::Quiz(QuizError::OptionsFull { max: 2 }));
        assert_eq!(c.quizzes[0].options().len(), 2);
    }

    #[test]
    fn missing_target_reports_id() {
        let mut c = card();
        let err = CardPatch::DeleteQuiz {
            quiz_id: QuizId::new("nope"),
        }
        .apply_to(&mut c, None)
        .unwrap_err();
        assert_eq!(err, PatchError::QuizNotFound(QuizId::new("nope")));
    }
}
